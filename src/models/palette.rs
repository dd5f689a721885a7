/// Default accent, also the fill color of the fallback course.
pub const ACCENT_COLOR: &str = "#007bffff";

/// Dark shade used for text on top of an unknown fill color.
pub const DEFAULT_SHADE: &str = "#373530";

/// Maps a course fill color to the darker shade used for its accents
/// (checkbox, course label, event title).
pub fn accent_shade(color: &str) -> &'static str {
    match color {
        "#FFFFFF" => "#373530",
        "#F1F1EF" => "#787774",
        "#F3EEEE" => "#976D57",
        "#F8ECDF" => "#CC782F",
        "#FAF3DD" => "#C29343",
        "#EEF3ED" => "#548164",
        "#E9F3F7" => "#487CA5",
        "#F6F3F8" => "#8A67AB",
        "#F9F2F5" => "#B35488",
        "#FAECEC" => "#C4554D",
        _ => DEFAULT_SHADE,
    }
}
