//! Bolivar to dollar conversion.

use tracing::debug;

use crate::models::{AnnotatedRow, PricedRow, ShapeError, Table};
use crate::scrapers::normalize::{USD, VES};

/// Round to cents.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_numeral(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert canonical price text to US dollars.
///
/// `"Bs. <n>"` is divided by `rate` (Bs. per dollar) and rounded to cents;
/// `"$ <n>"` is returned as is. Any other prefix, an unparsable numeral or an
/// unusable rate gives `None`.
pub fn to_usd(price: &str, rate: Option<f64>) -> Option<f64> {
    let price = price.trim();

    if let Some(numeral) = price.strip_prefix(VES) {
        let rate = rate.filter(|r| r.is_finite() && *r > 0.0)?;
        let value = parse_numeral(numeral);
        if value.is_none() {
            debug!("Unparsable bolivar price {:?}", price);
        }
        return value.map(|v| round2(v / rate));
    }

    if let Some(numeral) = price.strip_prefix(USD) {
        let value = parse_numeral(numeral);
        if value.is_none() {
            debug!("Unparsable dollar price {:?}", price);
        }
        return value;
    }

    debug!("Unknown currency in price {:?}", price);
    None
}

/// Append the USD column to every row.
///
/// Rows whose price can't be converted are kept with an empty USD price.
pub fn convert(
    table: Table<AnnotatedRow>,
    rate: Option<f64>,
) -> Result<Table<PricedRow>, ShapeError> {
    let priced = Table::from_rows(
        table
            .into_iter()
            .map(|row| {
                let usd = to_usd(row.product_price(), rate);
                row.with_usd(usd)
            })
            .collect(),
    );
    priced.check_shape()?;
    Ok(priced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductRow, Store};
    use chrono::NaiveDate;

    #[test]
    fn test_bolivars_divided_by_rate() {
        assert_eq!(to_usd("Bs. 100.00", Some(50.0)), Some(2.0));
        assert_eq!(to_usd("Bs. 10.00", Some(3.0)), Some(3.33));
        assert_eq!(to_usd("Bs.  1234.56 ", Some(35.0)), Some(35.27));
    }

    #[test]
    fn test_dollars_unchanged() {
        assert_eq!(to_usd("$ 3.50", Some(50.0)), Some(3.5));
        assert_eq!(to_usd("$ 3.456", None), Some(3.456));
    }

    #[test]
    fn test_unknown_currency_is_absent() {
        assert_eq!(to_usd("€ 3.50", Some(50.0)), None);
        assert_eq!(to_usd("", Some(50.0)), None);
    }

    #[test]
    fn test_bad_numeral_or_rate_is_absent() {
        assert_eq!(to_usd("Bs. incluido1234.00", Some(50.0)), None);
        assert_eq!(to_usd("$ Bs", Some(50.0)), None);
        assert_eq!(to_usd("Bs. 100.00", None), None);
        assert_eq!(to_usd("Bs. 100.00", Some(0.0)), None);
    }

    #[test]
    fn test_convert_keeps_rows_and_adds_column() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let table = Table::from_rows(vec![
            ProductRow::new("Pan".into(), "Bs. 70.00".into(), true).annotate(date, Store::Plazas, "pan"),
            ProductRow::new("Pan".into(), "€ 1.00".into(), true).annotate(date, Store::Gama, "pan"),
        ]);
        assert_eq!(table.width(), 6);

        let priced = convert(table, Some(35.0)).unwrap();
        assert_eq!(priced.width(), 7);
        assert_eq!(priced.len(), 2);
        assert_eq!(priced.rows()[0].product_price_dollar, Some(2.0));
        assert_eq!(priced.rows()[1].product_price_dollar, None);
    }
}
