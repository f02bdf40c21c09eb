/// Groups thousands with spaces and prints at most two decimals, trailing
/// zeros dropped: `38400.5` becomes `38 400,5`.
pub fn format_number(value: f64) -> String {
    format_with_decimals(value, 2)
}

/// Whole amounts print without decimals, fractional ones with two.
pub fn format_money(value: f64) -> String {
    let has_fraction = (value % 1.0).abs() > 0.001;
    if has_fraction {
        format!("{} ₽", format_fixed(value, 2))
    } else {
        format!("{} ₽", format_with_decimals(value, 0))
    }
}

/// Short form for calendar cells: `2,4 тыс ₽`, `1,2 млн ₽`.
pub fn format_money_compact(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{} млн ₽", format_with_decimals(value / 1_000_000.0, 1))
    } else if value >= 1_000.0 {
        format!("{} тыс ₽", format_with_decimals(value / 1_000.0, 1))
    } else {
        format_money(value)
    }
}

fn format_with_decimals(value: f64, max_decimals: usize) -> String {
    let fixed = format_fixed(value, max_decimals);
    if fixed.contains(',') {
        fixed.trim_end_matches('0').trim_end_matches(',').to_string()
    } else {
        fixed
    }
}

fn format_fixed(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match rendered.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && rendered.chars().any(|c| c != '0' && c != '.');
    let sign = if negative { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{}{},{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(11.5), "11,5");
        assert_eq!(format_number(3.333), "3,33");
        assert_eq!(format_number(1234567.0), "1 234 567");
        assert_eq!(format_number(-1500.25), "-1 500,25");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(38400.0), "38 400 ₽");
        assert_eq!(format_money(2400.5), "2 400,50 ₽");
        assert_eq!(format_money(0.0), "0 ₽");
    }

    #[test]
    fn test_format_money_compact() {
        assert_eq!(format_money_compact(2400.0), "2,4 тыс ₽");
        assert_eq!(format_money_compact(38400.0), "38,4 тыс ₽");
        assert_eq!(format_money_compact(1_260_000.0), "1,3 млн ₽");
        assert_eq!(format_money_compact(600.0), "600 ₽");
    }
}
