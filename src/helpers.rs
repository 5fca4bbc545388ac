/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[100.0, 110.0, 120.0]), Some(110.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(123.456, 1), 123.5);
        assert_eq!(round_to(123.454, 2), 123.45);
        assert_eq!(round_to(82.0, 2), 82.0);
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(
            capitalize("dosage/frequency review recommended; duplicate entries found"),
            "Dosage/frequency review recommended; duplicate entries found"
        );
        assert_eq!(
            capitalize("2 potential drug Interaction(s)"),
            "2 potential drug interaction(s)"
        );
        assert_eq!(capitalize(""), "");
    }
}
