/// Sentinel returned for inputs that carry no usable identifier.
pub const EMPTY_RUT: &str = "";

/// Normalize a raw RUT into its canonical comparison form.
///
/// Strips dots, dashes and inner spaces, uppercases the verifier digit
/// (`k` -> `K`) and removes leading zeros. Empty, whitespace-only or
/// all-zero input maps to the empty string rather than an error.
///
/// The function is idempotent: normalizing an already-normalized RUT
/// returns it unchanged.
pub fn normalize_rut(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .flat_map(char::to_uppercase)
        .collect();

    cleaned.trim_start_matches('0').to_string()
}

/// Join a numeric RUT column with its verifier-digit column.
///
/// Spreadsheet exports frequently render both cells as floats
/// (`"20640480.0"`, `"9.0"`), so integral float values are collapsed to
/// their integer text before concatenation. A verifier digit of `0` is
/// valid and must be kept; a missing or blank verifier yields just the
/// RUT part. An empty RUT cell yields the empty sentinel.
pub fn combine_rut_dv(rut: &str, dv: &str) -> String {
    let rut = clean_numeric_cell(rut);
    if rut.is_empty() {
        return EMPTY_RUT.to_string();
    }

    let dv = clean_numeric_cell(dv).to_uppercase();
    format!("{rut}{dv}")
}

/// Collapse a float-formatted cell (`"123.0"`) to integer text, then drop
/// any remaining dots and dashes.
fn clean_numeric_cell(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    if value.contains('.') {
        if let Ok(f) = value.parse::<f64>() {
            if f.fract() == 0.0 && f.abs() < 9e15 {
                return format!("{}", f as i64);
            }
        }
    }

    value
        .chars()
        .filter(|c| !matches!(c, '.' | '-'))
        .collect()
}

/// Normalize an email for comparison and output: trim and lowercase.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Combine paternal and maternal surnames into a single field.
pub fn combine_surnames(paterno: &str, materno: &str) -> String {
    let paterno = paterno.trim();
    let materno = materno.trim();

    match (paterno.is_empty(), materno.is_empty()) {
        (false, false) => format!("{paterno} {materno}"),
        (false, true) => paterno.to_string(),
        (true, false) => materno.to_string(),
        (true, true) => String::new(),
    }
}

/// Title-case a person name and collapse runs of whitespace.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
