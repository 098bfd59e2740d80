use serde::{Deserialize, Serialize};

use crate::core::multiset::{CategorizedMultisets, RutMultiset};
use crate::core::types::Outcome;

/// One output row per distinct RUT in the union of both sources.
///
/// Rows are created once and never mutated afterwards; they exist only
/// for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Normalized identifier.
    pub rut: String,
    pub outcome: Outcome,
    /// Category tag (OMG, PYME, ...) when the variant splits output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub count_carga: u32,
    pub count_bice: u32,
    /// Operator-facing observation (`OBSERVACION` column).
    pub note: String,
}

impl ResultRow {
    /// `ESTADO` column value: outcome label, suffixed by category when
    /// present (`COINCIDENCIA_OMG`).
    pub fn estado(&self) -> String {
        match &self.category {
            Some(cat) => format!("{}_{}", self.outcome.label(), cat),
            None => self.outcome.label().to_string(),
        }
    }

    /// `TIPO` column value.
    pub fn tipo(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// Classify every RUT in the union of one carga/bice multiset pair.
///
/// `ca > 0 && cb > 0 && ca == cb` is a match; unequal counts are a
/// quantity mismatch; a count of zero on either side yields the
/// corresponding only-in outcome. A key absent from both sides cannot
/// occur since keys come from the union.
pub fn reconcile(
    carga: &RutMultiset,
    bice: &RutMultiset,
    category: Option<&str>,
) -> Vec<ResultRow> {
    let mut keys: Vec<&str> = carga.keys().chain(bice.keys()).collect();
    keys.sort_unstable();
    keys.dedup();

    keys.into_iter()
        .map(|rut| classify(rut, carga.count(rut), bice.count(rut), category))
        .collect()
}

fn classify(rut: &str, ca: u32, cb: u32, category: Option<&str>) -> ResultRow {
    debug_assert!(ca > 0 || cb > 0, "key outside the union: {rut}");

    let tag = category.map(|c| format!("{c} ")).unwrap_or_default();
    let suffix = category.map(|c| format!(" {c}")).unwrap_or_default();

    let (outcome, note) = if ca > 0 && cb > 0 && ca == cb {
        (
            Outcome::Match,
            format!("OK - RUT {tag}presente en ambos archivos"),
        )
    } else if ca > 0 && cb > 0 {
        (
            Outcome::QuantityMismatch,
            format!("DIFERENCIA{suffix} - Carga tiene {ca} registros, BICE tiene {cb} registros"),
        )
    } else if ca > 0 {
        (
            Outcome::OnlyInCarga,
            format!("FALTA - RUT {tag}en Carga pero NO en BICE{suffix}"),
        )
    } else {
        (
            Outcome::OnlyInBice,
            format!("EXTRA - RUT en BICE{suffix} pero NO en Carga{suffix}"),
        )
    };

    ResultRow {
        rut: rut.to_string(),
        outcome,
        category: category.map(str::to_string),
        count_carga: ca,
        count_bice: cb,
        note,
    }
}

/// Reconcile every category pair and merge the rows.
///
/// Each category is compared independently: carga OMG against BICE OMG,
/// carga PYME against BICE PYME, and so on over the union of category
/// tags seen on either side. Categories never influence classification,
/// only output grouping.
///
/// A second pass annotates only-in rows whose RUT actually sits in the
/// other side under a different category, which is the usual cause: the
/// member was filed with the wrong company group, not dropped.
pub fn reconcile_categories(
    carga: &CategorizedMultisets,
    bice: &CategorizedMultisets,
) -> Vec<ResultRow> {
    let empty = RutMultiset::new();

    let mut categories: Vec<Option<&str>> = carga.categories().chain(bice.categories()).collect();
    categories.sort_unstable();
    categories.dedup();

    let mut rows = Vec::new();
    for category in categories {
        let ca = carga.get(category).unwrap_or(&empty);
        let cb = bice.get(category).unwrap_or(&empty);
        rows.extend(reconcile(ca, cb, category));
    }

    annotate_misfiled(&mut rows, carga, bice);
    sort_rows(&mut rows);
    rows
}

/// Flag RUTs that are "missing" from one category but present in the
/// other side under a different one.
fn annotate_misfiled(
    rows: &mut [ResultRow],
    carga: &CategorizedMultisets,
    bice: &CategorizedMultisets,
) {
    for row in rows.iter_mut() {
        let elsewhere = match row.outcome {
            Outcome::OnlyInCarga => other_category_with(bice, &row.rut, row.category.as_deref()),
            Outcome::OnlyInBice => other_category_with(carga, &row.rut, row.category.as_deref()),
            _ => None,
        };

        if let Some(found) = elsewhere {
            let side = match row.outcome {
                Outcome::OnlyInCarga => "BICE",
                _ => "Carga",
            };
            row.note
                .push_str(&format!(" (presente en {side} {found})"));
        }
    }
}

fn other_category_with(
    sets: &CategorizedMultisets,
    rut: &str,
    category: Option<&str>,
) -> Option<String> {
    sets.iter()
        .find(|(cat, set)| *cat != category && set.contains(rut))
        .map(|(cat, _)| cat.unwrap_or("(sin categoria)").to_string())
}

/// Report order: outcome rank, then category, then RUT.
pub fn sort_rows(rows: &mut [ResultRow]) {
    rows.sort_by(|a, b| {
        a.outcome
            .rank()
            .cmp(&b.outcome.rank())
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.rut.cmp(&b.rut))
    });
}
