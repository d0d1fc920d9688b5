//! Candidate filters: the cheap checks that drop non-useful images.
//!
//! Two filter points, both silent discards:
//!
//! - **Pre-fetch** — [`is_vector_format`]: a string-level check run before
//!   any network I/O, because vector formats cannot be decoded into pixels
//!   and must never be fetched.
//! - **Post-decode** — [`meets_min_area`]: dimensions are only known after
//!   decode, so the icon/spacer/tracking-pixel guard necessarily runs after
//!   the fetch stage.

/// File extension of the one vector format web pages commonly embed.
const VECTOR_EXTENSION: &str = ".svg";

/// True if the reference points at a vector image.
///
/// Matches the extension anywhere in the reference, not just at the end —
/// CDN URLs routinely bury the real filename mid-path
/// (`/cdn/logo.svg?w=200`), and query strings hide the suffix.
pub fn is_vector_format(raw: &str) -> bool {
    raw.to_ascii_lowercase().contains(VECTOR_EXTENSION)
}

/// True if a decoded image's pixel area reaches the minimum threshold.
///
/// Product computed in u64: two u32 dimensions can overflow a u32 multiply.
pub fn meets_min_area(width: u32, height: u32, min_pixel_area: u32) -> bool {
    u64::from(width) * u64::from(height) >= u64::from(min_pixel_area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_suffix_is_vector() {
        assert!(is_vector_format("https://x/logo.svg"));
    }

    #[test]
    fn svg_substring_is_vector() {
        assert!(is_vector_format("https://x/logo.svg?width=200"));
        assert!(is_vector_format("/assets/icon.svg.png"));
    }

    #[test]
    fn svg_check_is_case_insensitive() {
        assert!(is_vector_format("https://x/LOGO.SVG"));
    }

    #[test]
    fn raster_formats_are_not_vector() {
        assert!(!is_vector_format("https://x/photo.jpg"));
        assert!(!is_vector_format("//cdn/pic.webp"));
    }

    #[test]
    fn one_by_one_pixel_fails_default_area() {
        assert!(!meets_min_area(1, 1, 200));
    }

    #[test]
    fn area_threshold_is_inclusive() {
        assert!(meets_min_area(10, 20, 200));
        assert!(!meets_min_area(10, 19, 200));
    }

    #[test]
    fn large_dimensions_do_not_overflow() {
        assert!(meets_min_area(u32::MAX, u32::MAX, u32::MAX));
    }
}
