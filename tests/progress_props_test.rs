use av_morning_star::downloader::progress::{compute_percent, parse_line, ProgressEvent};
use av_morning_star::options::{FilenameTag, FilenameTemplate, FormatType};
use av_morning_star::utils::diagnostics::truncate_chars;
use proptest::prelude::*;

fn tag() -> impl Strategy<Value = FilenameTag> {
    prop::sample::select(FilenameTag::ALL.to_vec())
}

proptest! {
    #[test]
    fn percent_stays_in_range(
        text in ".{0,12}",
        downloaded in prop::option::of(-1e6f64..1e12),
        total in prop::option::of(-1e6f64..1e12),
        estimate in prop::option::of(-1e6f64..1e12),
    ) {
        let percent = compute_percent(&text, downloaded, total, estimate);
        prop_assert!((0.0..=100.0).contains(&percent));
    }

    #[test]
    fn template_lines_never_escape_range(
        percent in ".{0,8}",
        downloaded in "[0-9NA.]{0,10}",
        total in "[0-9NA.]{0,10}",
        name in "[^|\n]{0,40}",
    ) {
        let line = format!("[morningstar] downloading|{}|{}|{}|NA|NA|NA|{}", percent, downloaded, total, name);
        if let Some(ProgressEvent::Downloading(progress)) = parse_line(&line) {
            prop_assert!((0.0..=100.0).contains(&progress.percent));
            prop_assert!(!progress.filename.is_empty());
        }
    }

    #[test]
    fn arbitrary_output_is_handled(line in "\\PC{0,120}") {
        let _ = parse_line(&line);
    }

    #[test]
    fn template_keeps_unique_tags(tags in prop::collection::vec(tag(), 0..16)) {
        let template = FilenameTemplate::new(tags);
        let kept = template.tags();

        for (i, t) in kept.iter().enumerate() {
            prop_assert!(!kept[i + 1..].contains(t));
        }
        prop_assert_eq!(kept.len() + template.available().len(), FilenameTag::ALL.len());
        prop_assert!(template.build(FormatType::Audio).ends_with(".%(ext)s"));

        let stored: FilenameTemplate = template.to_string().parse().unwrap();
        prop_assert_eq!(stored, template);
    }

    #[test]
    fn truncation_is_a_char_prefix(text in "\\PC{0,64}", max in 0usize..80) {
        let cut = truncate_chars(&text, max);
        prop_assert!(text.starts_with(cut));
        prop_assert!(cut.chars().count() <= max);
    }
}
