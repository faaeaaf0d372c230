use chrono::Utc;
use std::path::Path;

/// Expands an archive file name template.
///
/// Supported placeholders (case-insensitive): `%stem%`, `%lib%`, `%variant%`,
/// `%datetime%`, `%date%`, `%unix%`.
pub fn expand_template(template: &str, library_file_name: &str, variant: &str) -> String {
    let now_utc = Utc::now();

    let stem = Path::new(library_file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| library_file_name.to_string());

    // %datetime% must be replaced before %date%
    let replacements = vec![
        ("%datetime%", now_utc.format("%Y-%m-%d_%H-%M-%S").to_string()),
        ("%date%", now_utc.format("%Y-%m-%d").to_string()),
        ("%unix%", format!("{}", now_utc.timestamp())),
        ("%stem%", stem),
        ("%lib%", library_file_name.to_string()),
        ("%variant%", variant.to_string()),
    ];

    let mut name = template.to_string();
    for (pattern, value) in replacements {
        name = replace_case_insensitive(&name, pattern, &value);
    }
    name
}

/// Archive file name for one archive of a package.
///
/// With `variant` set (split layout) the name is guaranteed to mention it: if the
/// template has no `%variant%` placeholder, `_<variant>` goes in front of the extension.
pub fn archive_file_name(template: &str, library_file_name: &str, variant: Option<&str>) -> String {
    let Some(variant) = variant else {
        return expand_template(template, library_file_name, "all");
    };

    if template.to_ascii_lowercase().contains("%variant%") {
        return expand_template(template, library_file_name, variant);
    }

    let expanded = expand_template(template, library_file_name, variant);
    let path = Path::new(&expanded);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{}_{}.{}",
            stem.to_string_lossy(),
            variant,
            ext.to_string_lossy()
        ),
        _ => format!("{expanded}_{variant}"),
    }
}

/// Case-insensitive replacement of an ASCII placeholder.
///
/// Only ASCII is folded so offsets found in the folded copy are valid in `s`.
fn replace_case_insensitive(s: &str, pattern: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let lower_s = s.to_ascii_lowercase();
    let lower_pattern = pattern.to_ascii_lowercase();

    let mut last_end = 0;
    let mut search_start = 0;

    while let Some(pos) = lower_s[search_start..].find(&lower_pattern) {
        let abs_pos = search_start + pos;
        result.push_str(&s[last_end..abs_pos]);
        result.push_str(replacement);
        last_end = abs_pos + pattern.len();
        search_start = last_end;
    }

    result.push_str(&s[last_end..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_uses_library_stem() {
        assert_eq!(
            archive_file_name("%stem%.zip", "native_win_app.lib", None),
            "native_win_app.zip"
        );
    }

    #[test]
    fn placeholders_are_case_insensitive() {
        assert_eq!(
            expand_template("%LIB%-%Variant%.zip", "app.lib", "debug"),
            "app.lib-debug.zip"
        );
    }

    #[test]
    fn split_names_are_distinct_without_placeholder() {
        let debug = archive_file_name("%stem%.zip", "app.lib", Some("debug"));
        let release = archive_file_name("%stem%.zip", "app.lib", Some("release"));
        assert_eq!(debug, "app_debug.zip");
        assert_eq!(release, "app_release.zip");
    }

    #[test]
    fn split_names_follow_explicit_placeholder() {
        assert_eq!(
            archive_file_name("%variant%/%stem%.zip", "app.lib", Some("release")),
            "release/app.zip"
        );
    }

    #[test]
    fn extensionless_template_gets_suffix() {
        assert_eq!(archive_file_name("bundle", "app.lib", Some("debug")), "bundle_debug");
    }

    #[test]
    fn non_ascii_text_around_placeholders_is_preserved() {
        assert_eq!(
            archive_file_name("İ%lib%_%variant%.zip", "app.lib", Some("debug")),
            "İapp.lib_debug.zip"
        );
        assert_eq!(
            archive_file_name("ȺȺ-%STEM%-ß.zip", "app.lib", None),
            "ȺȺ-app-ß.zip"
        );
    }

    #[test]
    fn date_placeholder_is_expanded() {
        let name = expand_template("%date%.zip", "app.lib", "all");
        assert_eq!(name.len(), "YYYY-MM-DD.zip".len());
        assert!(!name.contains('%'));
    }
}
