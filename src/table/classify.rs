use crate::record::{coerce_numeric, ParamValue};

/// Storage class of a parameter column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Float64; unparseable cells are null
    Numeric,
    /// UTC millisecond timestamps
    Timestamp,
    /// UTF-8 text
    Text,
}

impl ColumnKind {
    /// Short label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Text => "text",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a column from its non-null raw values.
///
/// - numbers and booleans only: numeric
/// - numbers mixed with text: numeric, text is coerced and failures become null
/// - text only: numeric if every value parses, otherwise text
/// - dates only: timestamp
/// - dates mixed with anything else: text
/// - no values at all: numeric (all null)
pub fn classify<'a>(values: impl IntoIterator<Item = &'a ParamValue>) -> ColumnKind {
    let mut numbers = 0usize;
    let mut texts = 0usize;
    let mut dates = 0usize;
    let mut text_all_numeric = true;

    for value in values {
        match value {
            ParamValue::Null => {}
            ParamValue::Number(_) | ParamValue::Bool(_) => numbers += 1,
            ParamValue::Date(_) => dates += 1,
            ParamValue::Text(s) => {
                texts += 1;
                if text_all_numeric && coerce_numeric(s).is_none() {
                    text_all_numeric = false;
                }
            }
        }
    }

    if dates > 0 {
        return if numbers == 0 && texts == 0 {
            ColumnKind::Timestamp
        } else {
            ColumnKind::Text
        };
    }

    if numbers > 0 || text_all_numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_numbers_are_numeric() {
        let values = [ParamValue::from(1.0), ParamValue::Null, ParamValue::from(true)];
        assert_eq!(classify(&values), ColumnKind::Numeric);
    }

    #[test]
    fn test_numbers_mixed_with_text_are_numeric() {
        let values = [ParamValue::from(5.0), ParamValue::from("n/a")];
        assert_eq!(classify(&values), ColumnKind::Numeric);
    }

    #[test]
    fn test_all_text_numeric_only_if_every_value_parses() {
        let parsable = [ParamValue::from("1.5"), ParamValue::from(" 2 ")];
        assert_eq!(classify(&parsable), ColumnKind::Numeric);

        let one_bad = [ParamValue::from("1.5"), ParamValue::from("OK"), ParamValue::from("3")];
        assert_eq!(classify(&one_bad), ColumnKind::Text);
    }

    #[test]
    fn test_dates() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            classify(&[ParamValue::from(ts), ParamValue::Null]),
            ColumnKind::Timestamp
        );
        assert_eq!(
            classify(&[ParamValue::from(ts), ParamValue::from(3.0)]),
            ColumnKind::Text
        );
    }

    #[test]
    fn test_all_null_is_numeric() {
        assert_eq!(classify(&[ParamValue::Null, ParamValue::Null]), ColumnKind::Numeric);
        assert_eq!(classify(std::iter::empty()), ColumnKind::Numeric);
    }
}
