/// Year axis of the viewer: bounds, slider step, presets, formatting.

pub const MIN_YEAR: i32 = -3000;
pub const MAX_YEAR: i32 = 2020;
pub const YEAR_STEP: i32 = 100;

/// Quick-jump presets shown under the timeline.
pub const PRESETS: &[(&str, i32)] = &[
    ("2000 BCE", -2000),
    ("500 BCE", -500),
    ("Year 0", 0),
    ("1000 CE", 1000),
    ("1500 CE", 1500),
    ("1900 CE", 1900),
    ("Modern", 2020),
];

pub fn clamp_year(year: i32) -> i32 {
    year.clamp(MIN_YEAR, MAX_YEAR)
}

/// Human-readable year label. Negative years are BCE; year 0 is shown as CE.
pub fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BCE", -year)
    } else {
        format!("{year} CE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_slider_range() {
        assert_eq!(clamp_year(-99_999), MIN_YEAR);
        assert_eq!(clamp_year(2120), MAX_YEAR);
        assert_eq!(clamp_year(100), 100);
        assert_eq!(clamp_year(MIN_YEAR), MIN_YEAR);
    }

    #[test]
    fn formats_bce_and_ce() {
        assert_eq!(format_year(-2000), "2000 BCE");
        assert_eq!(format_year(0), "0 CE");
        assert_eq!(format_year(1500), "1500 CE");
    }

    #[test]
    fn presets_are_within_bounds_and_ordered() {
        let mut prev = i32::MIN;
        for &(_, year) in PRESETS {
            assert_eq!(clamp_year(year), year);
            assert!(year > prev);
            prev = year;
        }
    }
}
