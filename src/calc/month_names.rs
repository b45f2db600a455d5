//! Fixed English month-name tables, indexed by zero-based month.

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_SHORT_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
];

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month as usize).copied()
}

pub fn month_short_name(month: u32) -> Option<&'static str> {
    MONTH_SHORT_NAMES.get(month as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name_known_values() {
        assert_eq!(month_name(0), Some("January"));
        assert_eq!(month_name(6), Some("July"));
        assert_eq!(month_name(11), Some("December"));
    }

    #[test]
    fn test_month_short_name_known_values() {
        assert_eq!(month_short_name(0), Some("Jan"));
        assert_eq!(month_short_name(8), Some("Sept"));
        assert_eq!(month_short_name(11), Some("Dec"));
    }

    #[test]
    fn test_month_name_out_of_range() {
        assert_eq!(month_name(12), None);
        assert_eq!(month_short_name(99), None);
    }
}
