//! Price and name text cleaning, one rule set per store.
//!
//! Every cleaner turns the raw text of a price element into canonical
//! `"<symbol> <numeral>"` form. They are literal string rewrites; text that
//! doesn't fit a store's format passes through and is caught later by the
//! currency converter.

/// Signature shared by all price cleaners.
pub type PriceCleaner = fn(&str) -> String;

/// Dollar prefix.
pub const USD: &str = "$";
/// Bolivar prefix.
pub const VES: &str = "Bs.";

/// Trim surrounding whitespace from a product name.
pub fn clean_name(raw: &str) -> String {
    raw.trim().to_string()
}

/// Gama: `"Total Ref. 1.234,56"` -> `"$ 1234.56"`.
pub fn clean_gama_price(raw: &str) -> String {
    let numeral = raw
        .replace("Total Ref. ", "")
        .replace('.', "")
        .replace(',', ".");
    format!("{} {}", USD, numeral)
}

/// Central Madeirense: drops the currency label in front of the numeral.
pub fn clean_central_price(raw: &str) -> String {
    let text = raw
        .replace('\u{a0}', "")
        .replace('.', "")
        .replace(',', ".")
        .replace('#', "");
    let text = text.trim();
    let numeral = if text.contains(' ') {
        text.split(' ').nth(1).unwrap_or_default()
    } else {
        text
    };
    format!("{} {}", USD, numeral)
}

/// Plazas: keeps what follows the first "IVA" marker, if any.
pub fn clean_plazas_price(raw: &str) -> String {
    let text = match raw.split_once("IVA") {
        Some((_, after)) => after,
        None => raw,
    };
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let numeral = compact.replace("(E)", "").replace(',', "");
    format!("{} {}", VES, numeral)
}

/// Plan Suarez: drops thousands separators and spaces out the "Bs." token.
pub fn clean_plan_suarez_price(raw: &str) -> String {
    raw.replace(',', "").replace(VES, "Bs. ")
}
