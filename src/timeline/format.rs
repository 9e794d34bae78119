// Display helpers for the timeline.
// Number and date formatting, language colors, and plain-text rendering.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::aggregator::TimelineData;
use super::model::ProcessedRepo;

const DEFAULT_LANGUAGE_COLOR: &str = "#6b7280";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("TypeScript", "#3178c6"),
    ("JavaScript", "#f7df1e"),
    ("Python", "#3572A5"),
    ("Rust", "#dea584"),
    ("Go", "#00ADD8"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("Ruby", "#701516"),
    ("Swift", "#F05138"),
    ("Kotlin", "#A97BFF"),
    ("Svelte", "#ff3e00"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Shell", "#89e051"),
    ("Dockerfile", "#384d54"),
    ("MDX", "#fcb32c"),
];

/// Hex color for a language, grey when unknown.
pub fn language_color(language: Option<&str>) -> &'static str {
    language
        .and_then(|lang| {
            LANGUAGE_COLORS
                .iter()
                .find(|(name, _)| *name == lang)
                .map(|(_, color)| *color)
        })
        .unwrap_or(DEFAULT_LANGUAGE_COLOR)
}

/// 1_400_000 -> "1.4M", 4_200 -> "4.2K", 999 -> "999".
pub fn format_lines_of_code(loc: u64) -> String {
    if loc >= 1_000_000 {
        format!("{:.1}M", loc as f64 / 1_000_000.0)
    } else if loc >= 1_000 {
        format!("{:.1}K", loc as f64 / 1_000.0)
    } else {
        loc.to_string()
    }
}

/// "Mar 2024".
pub fn format_timeline_date(date: DateTime<Utc>) -> String {
    date.format("%b %Y").to_string()
}

fn format_repo_line(repo: &ProcessedRepo) -> String {
    let mut line = format!(
        "{:<9} {:<32} {:<12} {:<7} {:>7} LOC {:>6} commits  [{}]",
        format_timeline_date(repo.pushed_at),
        repo.display_name,
        repo.language.as_deref().unwrap_or("-"),
        language_color(repo.language.as_deref()),
        format_lines_of_code(repo.lines_of_code),
        repo.commit_count,
        repo.size_category.label(),
    );
    if repo.stars > 0 {
        let _ = write!(line, " ★{}", repo.stars);
    }
    line
}

/// Plain-text timeline. A marker line separates repositories active in the last
/// ten weeks from older ones.
pub fn render_timeline(data: &TimelineData) -> String {
    let mut out = String::new();

    if let Some(error) = &data.error {
        let _ = writeln!(out, "error: {}", error);
    }
    if data.repos.is_empty() {
        out.push_str("No repositories to show.\n");
        return out;
    }

    let mut marker_written = false;
    for repo in &data.repos {
        if !marker_written && repo.pushed_at < data.ten_weeks_ago_date {
            let _ = writeln!(
                out,
                "---- 10 weeks ago ({}) ----",
                data.ten_weeks_ago_date.format("%Y-%m-%d")
            );
            marker_written = true;
        }
        out.push_str(&format_repo_line(repo));
        out.push('\n');
    }

    if data.from_cache {
        out.push_str("(served from cache)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::model::SizeCategory;
    use chrono::{Duration, TimeZone};

    fn processed(name: &str, pushed: DateTime<Utc>) -> ProcessedRepo {
        ProcessedRepo {
            id: 1,
            name: name.to_string(),
            display_name: name.to_string(),
            description: None,
            url: String::new(),
            homepage: None,
            language: Some("Rust".to_string()),
            stars: 0,
            forks: 0,
            size: 0,
            commit_count: 3,
            lines_of_code: 2_500,
            size_category: SizeCategory::Medium,
            created_at: pushed,
            updated_at: pushed,
            pushed_at: pushed,
            topics: Vec::new(),
            is_fork: false,
            is_archived: false,
            is_within_last_10_weeks: false,
        }
    }

    #[test]
    fn test_format_lines_of_code() {
        assert_eq!(format_lines_of_code(0), "0");
        assert_eq!(format_lines_of_code(999), "999");
        assert_eq!(format_lines_of_code(1_000), "1.0K");
        assert_eq!(format_lines_of_code(4_200), "4.2K");
        assert_eq!(format_lines_of_code(1_500_000), "1.5M");
    }

    #[test]
    fn test_format_timeline_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        assert_eq!(format_timeline_date(date), "Mar 2024");
    }

    #[test]
    fn test_language_color() {
        assert_eq!(language_color(Some("Rust")), "#dea584");
        assert_eq!(language_color(Some("COBOL")), DEFAULT_LANGUAGE_COLOR);
        assert_eq!(language_color(None), DEFAULT_LANGUAGE_COLOR);
    }

    #[test]
    fn test_render_marker_position() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let cutoff = now - Duration::days(70);
        let data = TimelineData {
            repos: vec![
                processed("recent", now - Duration::days(2)),
                processed("old", now - Duration::days(200)),
                processed("older", now - Duration::days(400)),
            ],
            ten_weeks_ago_date: cutoff,
            error: None,
            from_cache: true,
        };

        let rendered = render_timeline(&data);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].contains("recent"));
        assert!(lines[1].starts_with("---- 10 weeks ago (2024-03-23)"));
        assert!(lines[2].contains("old"));
        assert!(lines[2].contains("2.5K LOC"));
        assert!(lines[2].contains("#dea584"));
        assert_eq!(rendered.matches("10 weeks ago").count(), 1);
        assert!(rendered.ends_with("(served from cache)\n"));
    }

    #[test]
    fn test_render_error() {
        let data = TimelineData {
            repos: Vec::new(),
            ten_weeks_ago_date: Utc::now(),
            error: Some("Failed to fetch repos: 403".to_string()),
            from_cache: false,
        };

        let rendered = render_timeline(&data);
        assert!(rendered.starts_with("error: Failed to fetch repos: 403\n"));
        assert!(rendered.contains("No repositories to show."));
    }
}
