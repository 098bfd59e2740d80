use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::roster::suffix::{EmailAllocator, RutSuffixer};

/// One row of the Activos/Inactivos reference sheet, already reduced
/// and RUT-normalized by the caller.
#[derive(Debug, Clone)]
pub struct MemberRow {
    pub rut: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
}

/// One user currently present in the target system.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub rut: String,
    pub email: String,
    pub active: bool,
}

/// An addition to upload, in portal column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Addition {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub rut: String,
}

/// Output of the three-pass alta/baja computation. State-free: built in
/// one shot from the three inputs and discarded after writing.
#[derive(Debug, Default, Serialize)]
pub struct RosterPlan {
    /// Users to add (Activos not present among active target users).
    pub altas: Vec<Addition>,
    /// Additions that lack an email; routed to an error list instead of
    /// the upload file.
    pub altas_sin_email: Vec<Addition>,
    /// Active target users missing from the Activos sheet.
    pub orphan_active: Vec<String>,
    /// Inactivos entries still active in the target system.
    pub bajas: Vec<String>,
}

impl RosterPlan {
    /// Distinct RUTs across both deactivation lists.
    pub fn total_bajas(&self) -> usize {
        let mut all: BTreeSet<&str> = self.orphan_active.iter().map(String::as_str).collect();
        all.extend(self.bajas.iter().map(String::as_str));
        all.len()
    }
}

/// Compute the alta/baja plan.
///
/// Pass 1 (ALTAS): Activos rows get duplicate-suffixed RUTs and emails in
/// sheet order; any suffixed RUT not among the currently-active target
/// RUTs becomes an addition.
///
/// Pass 2 (orphans): active target RUTs absent from the suffixed Activos
/// set become deactivation candidates.
///
/// Pass 3 (BAJAS): Inactivos RUTs that are still active in the target
/// system become deactivations, except those also present in Activos:
/// the Activos sheet always wins, so a RUT listed on both sheets stays
/// active and appears in neither deactivation list.
pub fn plan(activos: &[MemberRow], inactivos: &[MemberRow], users: &[UserRow]) -> RosterPlan {
    let active_user_ruts: HashSet<&str> = users
        .iter()
        .filter(|u| u.active && !u.rut.is_empty())
        .map(|u| u.rut.as_str())
        .collect();

    // Pass 1: suffix duplicates, then keep rows the target doesn't know.
    let mut suffixer = RutSuffixer::new();
    let mut emails = EmailAllocator::with_existing(users.iter().map(|u| u.email.as_str()));
    let mut suffixed_base: HashSet<String> = HashSet::new();
    let mut altas = Vec::new();
    let mut altas_sin_email = Vec::new();

    for row in activos {
        if row.rut.is_empty() {
            continue;
        }
        let rut = suffixer.allocate(&row.rut);
        suffixed_base.insert(rut.clone());

        if active_user_ruts.contains(rut.as_str()) {
            continue;
        }

        let addition = Addition {
            nombre: row.nombre.clone(),
            apellido: row.apellido.clone(),
            email: emails.allocate(&row.email),
            rut,
        };
        if addition.email.is_empty() {
            altas_sin_email.push(addition);
        } else {
            altas.push(addition);
        }
    }

    if !altas_sin_email.is_empty() {
        warn!(
            count = altas_sin_email.len(),
            "additions without email moved to the error list"
        );
    }

    // Pass 2: active in the target system but not in Activos.
    let orphan_active: Vec<String> = {
        let mut ruts: Vec<String> = active_user_ruts
            .iter()
            .filter(|rut| !suffixed_base.contains(**rut))
            .map(|rut| (*rut).to_string())
            .collect();
        ruts.sort_unstable();
        ruts
    };

    // Pass 3: Inactivos still active in the target, Activos prevailing.
    let activos_ruts: HashSet<&str> = activos
        .iter()
        .filter(|r| !r.rut.is_empty())
        .map(|r| r.rut.as_str())
        .collect();

    let inactivos_ruts: BTreeSet<&str> = inactivos
        .iter()
        .filter(|r| !r.rut.is_empty())
        .map(|r| r.rut.as_str())
        .collect();

    let overlap = inactivos_ruts
        .iter()
        .filter(|rut| activos_ruts.contains(*rut))
        .count();
    if overlap > 0 {
        debug!(
            overlap,
            "RUTs listed on both sheets stay active (Activos wins)"
        );
    }

    let bajas: Vec<String> = inactivos_ruts
        .into_iter()
        .filter(|rut| !activos_ruts.contains(rut))
        .filter(|rut| active_user_ruts.contains(rut))
        .map(str::to_string)
        .collect();

    RosterPlan {
        altas,
        altas_sin_email,
        orphan_active,
        bajas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(rut: &str, email: &str) -> MemberRow {
        MemberRow {
            rut: rut.to_string(),
            nombre: "Ana".to_string(),
            apellido: "Perez Soto".to_string(),
            email: email.to_string(),
        }
    }

    fn user(rut: &str, active: bool) -> UserRow {
        UserRow {
            rut: rut.to_string(),
            email: format!("{rut}@x.com"),
            active,
        }
    }

    #[test]
    fn test_altas_excludes_known_active_users() {
        let activos = vec![member("111", "a@x.com"), member("222", "b@x.com")];
        let users = vec![user("111", true)];

        let plan = plan(&activos, &[], &users);
        assert_eq!(plan.altas.len(), 1);
        assert_eq!(plan.altas[0].rut, "222");
    }

    #[test]
    fn test_inactive_target_user_is_added_again() {
        // Present in the target but inactive: counts as missing.
        let activos = vec![member("111", "a@x.com")];
        let users = vec![user("111", false)];

        let plan = plan(&activos, &[], &users);
        assert_eq!(plan.altas.len(), 1);
    }

    #[test]
    fn test_duplicate_rows_get_suffixed_identifiers() {
        let activos = vec![
            member("15377075", "a@x.com"),
            member("15377075", "a@x.com"),
            member("15377075", "a@x.com"),
        ];

        let plan = plan(&activos, &[], &[]);
        let pairs: Vec<(&str, &str)> = plan
            .altas
            .iter()
            .map(|a| (a.rut.as_str(), a.email.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("15377075", "a@x.com"),
                ("153770750", "a-copy@x.com"),
                ("1537707500", "a--copy@x.com"),
            ]
        );
    }

    #[test]
    fn test_suffixed_duplicate_matches_existing_user() {
        // Second occurrence is already loaded under the zero-suffixed RUT.
        let activos = vec![member("111", "a@x.com"), member("111", "a@x.com")];
        let users = vec![user("111", true), user("1110", true)];

        let plan = plan(&activos, &[], &users);
        assert!(plan.altas.is_empty());
        assert!(plan.orphan_active.is_empty());
    }

    #[test]
    fn test_missing_email_goes_to_error_list() {
        let activos = vec![member("111", ""), member("222", "b@x.com")];
        let plan = plan(&activos, &[], &[]);

        assert_eq!(plan.altas.len(), 1);
        assert_eq!(plan.altas_sin_email.len(), 1);
        assert_eq!(plan.altas_sin_email[0].rut, "111");
    }

    #[test]
    fn test_orphan_active_detection() {
        let activos = vec![member("111", "a@x.com")];
        let users = vec![user("111", true), user("999", true), user("888", false)];

        let plan = plan(&activos, &[], &users);
        assert_eq!(plan.orphan_active, vec!["999".to_string()]);
    }

    #[test]
    fn test_bajas_only_for_active_target_users() {
        let inactivos = vec![member("111", ""), member("222", "")];
        let users = vec![user("111", true), user("222", false)];

        let plan = plan(&[], &inactivos, &users);
        assert_eq!(plan.bajas, vec!["111".to_string()]);
    }

    #[test]
    fn test_activos_overrides_inactivos() {
        // Listed on both sheets and active in the target: stays active,
        // excluded from both deactivation lists.
        let activos = vec![member("111", "a@x.com")];
        let inactivos = vec![member("111", "")];
        let users = vec![user("111", true)];

        let plan = plan(&activos, &inactivos, &users);
        assert!(plan.bajas.is_empty());
        assert!(plan.orphan_active.is_empty());
        assert!(plan.altas.is_empty());
    }

    #[test]
    fn test_total_bajas_deduplicates() {
        let inactivos = vec![member("111", "")];
        let users = vec![user("111", true), user("999", true)];

        let plan = plan(&[], &inactivos, &users);
        // "111" appears in bajas, "999" and "111" in orphan_active.
        assert_eq!(plan.total_bajas(), 2);
    }
}
