use std::sync::OnceLock;

use regex::Regex;

/// Shown when a recipe has no image of its own.
pub const FALLBACK_IMAGE: &str = "https://images.unsplash.com/photo-1519708227418-c8fd9a32b7a2";

fn step_marker() -> &'static Regex {
    static STEP_MARKER: OnceLock<Regex> = OnceLock::new();
    STEP_MARKER.get_or_init(|| Regex::new(r"^(?:\d+\.\s*)?(?:[-*]\s*)?").expect("valid step regex"))
}

/// Splits free-form instructions into steps, dropping `1.` numbering,
/// `-`/`*` bullets and blank lines.
pub fn instruction_steps(instructions: &str) -> Vec<String> {
    instructions
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| step_marker().replace(line, "").trim().to_string())
        .filter(|step| !step.is_empty())
        .collect()
}

/// Total minutes, e.g. "35 mins".
pub fn total_time(prep_time: u32, cook_time: u32) -> String {
    format!("{} mins", prep_time.saturating_add(cook_time))
}

/// Resolves a stored image path to a URL under `<base>/static/`.
///
/// Absolute URLs pass through; server paths such as
/// `uploaded_images/recipe_1.png` keep only the file name.
pub fn image_url(base: &url::Url, image: Option<&str>) -> String {
    let Some(path) = image.map(str::trim).filter(|p| !p.is_empty()) else {
        return FALLBACK_IMAGE.to_string();
    };
    if path.starts_with("http") {
        return path.to_string();
    }
    let file = path.rsplit('/').next().unwrap_or(path);
    match base.join(&format!("static/{file}")) {
        Ok(url) => url.to_string(),
        Err(_) => FALLBACK_IMAGE.to_string(),
    }
}
