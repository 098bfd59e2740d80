use std::collections::{HashMap, HashSet};

use crate::core::normalize::normalize_email;

/// Disambiguates repeated RUTs within one sheet.
///
/// The portal keys users by RUT, so a payer covering several pets needs
/// one synthetic identifier per row. The n-th occurrence (1-indexed) of
/// a RUT gets `n - 1` literal `'0'` characters appended; the first
/// occurrence is left untouched. This is textual concatenation, never
/// arithmetic, and is deterministic given the sheet's row order.
#[derive(Debug, Default)]
pub struct RutSuffixer {
    seen: HashMap<String, u32>,
}

impl RutSuffixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the disambiguated RUT for the next occurrence of `rut`.
    pub fn allocate(&mut self, rut: &str) -> String {
        let n = self.seen.entry(rut.to_string()).or_insert(0);
        *n += 1;
        let zeros = (*n - 1) as usize;
        format!("{rut}{}", "0".repeat(zeros))
    }

    /// Occurrences allocated so far for `rut`.
    pub fn occurrences(&self, rut: &str) -> u32 {
        self.seen.get(rut).copied().unwrap_or(0)
    }
}

/// Allocates unique emails by inserting `-copy` markers before the `@`.
///
/// The second occurrence gets `-copy`, the third `--copy`: each further
/// copy adds one more dash in front of the single `copy` token. The
/// allocator is seeded with the emails already present in the target
/// system so a fresh addition never collides with an existing account.
#[derive(Debug, Default)]
pub struct EmailAllocator {
    taken: HashSet<String>,
}

impl EmailAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with emails already in use (normalized internally).
    pub fn with_existing<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let taken = emails
            .into_iter()
            .map(|e| normalize_email(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self { taken }
    }

    /// Return a unique email for `raw`, reserving it for later calls.
    /// Empty input is returned unchanged and never reserved.
    pub fn allocate(&mut self, raw: &str) -> String {
        let base = normalize_email(raw);
        if base.is_empty() {
            return base;
        }

        if self.taken.insert(base.clone()) {
            return base;
        }

        for dashes in 1.. {
            let candidate = with_copy_marker(&base, dashes);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
        unreachable!("copy marker search is unbounded")
    }
}

/// Insert `-...-copy` (with `dashes` dashes) before the `@`, or append
/// it when the address has no domain part.
fn with_copy_marker(email: &str, dashes: usize) -> String {
    let marker = format!("{}copy", "-".repeat(dashes));
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}{marker}@{domain}"),
        None => format!("{email}{marker}"),
    }
}
