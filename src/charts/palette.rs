use crate::charts::types::Rgb;
use crate::models::canonical_service_type;

/// Fixed colors keyed by canonical service type code.
static SERVICE_COLORS: &[(&str, Rgb)] = &[
    ("yellow", Rgb::new(0xFF, 0xD7, 0x00)),
    ("green", Rgb::new(0x32, 0xCD, 0x32)),
    ("fhv", Rgb::new(0x41, 0x69, 0xE1)),
    ("fhvhv", Rgb::new(0xFF, 0x63, 0x47)),
];

/// Used for any service type not in the palette.
pub const FALLBACK_COLOR: Rgb = Rgb::new(0x99, 0x99, 0x99);

pub const REVENUE_COLOR: Rgb = Rgb::new(0x20, 0xB2, 0xAA);
pub const BOROUGH_COLOR: Rgb = Rgb::new(0x6A, 0x5A, 0xCD);

/// Color for a service type. Depends only on the code itself, never on which
/// other types are present.
pub fn color_for_service(service_type: &str) -> Rgb {
    let canonical = canonical_service_type(service_type);
    SERVICE_COLORS
        .iter()
        .find(|(code, _)| *code == canonical)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KNOWN_SERVICE_TYPES;

    #[test]
    fn test_known_codes_have_distinct_colors() {
        let colors: Vec<Rgb> = KNOWN_SERVICE_TYPES
            .iter()
            .map(|code| color_for_service(code))
            .collect();

        for (i, a) in colors.iter().enumerate() {
            assert_ne!(*a, FALLBACK_COLOR);
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_color_is_stable_and_case_insensitive() {
        assert_eq!(color_for_service("yellow"), Rgb::new(0xFF, 0xD7, 0x00));
        assert_eq!(color_for_service("yellow"), color_for_service("yellow"));
        assert_eq!(color_for_service(" Yellow"), color_for_service("yellow"));
    }

    #[test]
    fn test_unknown_code_gets_fallback() {
        assert_eq!(color_for_service("pedicab"), FALLBACK_COLOR);
        assert_eq!(color_for_service(""), FALLBACK_COLOR);
    }
}
