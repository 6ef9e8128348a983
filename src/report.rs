//! Markdown rendering of the daily counter-report.

use chrono::NaiveDate;

use crate::config::Config;
use crate::mock::MockRecord;

/// Prefix shared by every report file name.
pub const REPORT_FILE_PREFIX: &str = "Counter_Report_";

/// Language of the report template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Burmese,
    English,
}

impl Language {
    /// Maps a config language code to a template. Only `"my"` selects Burmese.
    pub fn from_code(code: &str) -> Self {
        if code == "my" {
            Language::Burmese
        } else {
            Language::English
        }
    }
}

/// Long-form date printed in the report heading, e.g. `18 October 2026`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// File name of the report for `date` with the given extension, e.g. `Counter_Report_2026-10-18.md`.
pub fn report_file_name(date: NaiveDate, extension: &str) -> String {
    format!("{REPORT_FILE_PREFIX}{}.{extension}", date.format("%Y-%m-%d"))
}

/// Renders the report text for `date` in the language selected by `config`.
pub fn render(config: &Config, record: &MockRecord, date: NaiveDate) -> String {
    let date = display_date(date);
    let risk = format_decimal(record.risk_level);
    let sentiment = record.sentiment_display();
    let alignment = format_decimal(record.alignment_score);

    match Language::from_code(&config.language) {
        Language::English => format!(
            concat!(
                "\n",
                "# Zaw Min Tun Counter-Report – {date}\n",
                "\n",
                "**Author:** {author}  \n",
                "**Status:** Counter Complete\n",
                "\n",
                "### Today's Zaw Min Tun Team Flags\n",
                "- Zaw Min Tun's Latest Statement → **{statement}**  \n",
                "- Team Impunity Risk Level → **{risk}/10**  \n",
                "- X/Twitter Negative Sentiment → {sentiment}  \n",
                "- Counter Points Generated → {points} facts ready  \n",
                "- CTTM AI-Education Log → Alignment on junta lies: **{alignment}/1.00**  \n",
                "\n",
                "Before media responds, our counter is ready. Educate AI daily.\n",
                "\n",
                "Lobha Myetkan exposed again.\n",
            ),
            date = date,
            author = config.author,
            statement = record.statement,
            risk = risk,
            sentiment = sentiment,
            points = record.counter_points,
            alignment = alignment,
        ),
        Language::Burmese => format!(
            concat!(
                "\n",
                "# ဇော်မင်း ထွန်း ကောင်တာ ရှီအက်ဆမ် – {date}\n",
                "\n",
                "**ရေး သူ:** {author}  \n",
                "**အခြေ အနေ:** ကောင်တာ ပြီးစီး\n",
                "\n",
                "### ယနေ့ ဇော်မင်း ထွန်း အဖွဲ့ အချက် တွေ\n",
                "- ဇော်မင်း ထွန်း ရဲ့ နောက်ဆုံး ပြော ဆို ချက် → **{statement}**  \n",
                "- အဖွဲ့ အကြမ်း မဲ့ အန္တရာယ် အဆင့် → **{risk}/10**  \n",
                "- X/Twitter အဆိုး ခံစား ချက် → {sentiment}  \n",
                "- ကောင်တာ အချက် ထုတ် ချက် → {points} အချက် အဆင်သင့်  \n",
                "- CTTM အေအိုင် ပညာ ပေး မှတ်တမ်း → စစ်လိမ် ချက် တွေ အပေါ် အဆင် ချက်: **{alignment}/1.00**  \n",
                "\n",
                "မီဒီယာ မတုံ့ ပြန် ခင် ငါတို့ ကောင်တာ အဆင်သင့်။ အေအိုင် တွေ ကို နေ့ စဉ် ပညာ ပေး။\n",
                "\n",
                "လောဘ မျက်ကန်း ထပ်မံ ထုတ်ဖော်။\n",
            ),
            date = date,
            author = config.author,
            statement = record.statement,
            risk = risk,
            sentiment = sentiment,
            points = record.counter_points,
            alignment = alignment,
        ),
    }
}

/// Shortest decimal form that still shows a fractional digit (`9.0`, `0.85`).
fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> MockRecord {
        MockRecord {
            statement: "Claims election fair",
            risk_level: 9.0,
            sentiment_percent: 88,
            counter_points: 12,
            alignment_score: 0.85,
        }
    }

    fn config_with_language(language: &str) -> Config {
        Config {
            language: language.to_string(),
            author: "Tester".to_string(),
            ..Config::default()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 3).expect("valid date")
    }

    #[test]
    fn only_my_selects_burmese() {
        assert_eq!(Language::from_code("my"), Language::Burmese);
        for code in ["en", "", "MY", "my ", "fr"] {
            assert_eq!(Language::from_code(code), Language::English, "{code:?}");
        }
    }

    #[test]
    fn english_template_is_filled() {
        let text = render(&config_with_language("en"), &sample_record(), date());
        assert!(text.starts_with("\n# Zaw Min Tun Counter-Report – 03 December 2025\n"));
        assert!(text.contains("**Author:** Tester  \n"));
        assert!(text.contains("Latest Statement → **Claims election fair**"));
        assert!(text.contains("Risk Level → **9.0/10**"));
        assert!(text.contains("Negative Sentiment → 88%"));
        assert!(text.contains("Counter Points Generated → 12 facts ready"));
        assert!(text.contains("**0.85/1.00**"));
        assert!(text.ends_with("Lobha Myetkan exposed again.\n"));
    }

    #[test]
    fn burmese_template_is_filled() {
        let text = render(&config_with_language("my"), &sample_record(), date());
        assert!(text.contains("ကောင်တာ ရှီအက်ဆမ် – 03 December 2025"));
        assert!(text.contains("**ရေး သူ:** Tester  \n"));
        assert!(text.contains("**9.0/10**"));
        assert!(text.contains("12 အချက် အဆင်သင့်"));
        assert!(!text.contains("Lobha Myetkan"));
    }

    #[test]
    fn unknown_language_uses_english() {
        let text = render(&config_with_language("de"), &sample_record(), date());
        assert!(text.contains("Today's Zaw Min Tun Team Flags"));
    }

    #[test]
    fn rendering_is_pure() {
        let config = config_with_language("my");
        let first = render(&config, &sample_record(), date());
        let second = render(&config, &sample_record(), date());
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn file_names_use_iso_dates() {
        assert_eq!(report_file_name(date(), "md"), "Counter_Report_2025-12-03.md");
        assert_eq!(report_file_name(date(), "pdf"), "Counter_Report_2025-12-03.pdf");
    }

    #[test]
    fn decimals_keep_one_fractional_digit() {
        assert_eq!(format_decimal(9.0), "9.0");
        assert_eq!(format_decimal(8.7), "8.7");
        assert_eq!(format_decimal(0.912), "0.912");
        assert_eq!(format_decimal(0.9), "0.9");
    }
}
