//! Template macro expansion for the wallpaper text.
//!
//! The user text may contain `#date`, `#time`, `#day`, `#battery` and
//! `#charging` tokens (case-insensitive) plus `@word`, which renders as the
//! bare word. Anything else passes through untouched.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use super::context::RenderContext;

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#date").unwrap());
static TIME_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#time").unwrap());
static DAY_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#day").unwrap());
static BATTERY_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#battery").unwrap());
static CHARGING_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#charging").unwrap());
static WORD_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").unwrap());

/// Expands every token in one line. Tokens may appear anywhere and any
/// number of times; substitution happens in a fixed order across the line.
pub fn render_line(line: &str, ctx: &RenderContext) -> String {
    let battery = if ctx.charging {
        format!("{}% (charging)", ctx.battery_percent)
    } else {
        format!("{}%", ctx.battery_percent)
    };
    let charging = if ctx.charging { "Charging" } else { "Not charging" };

    let line = DATE_TOKEN.replace_all(line, NoExpand(&ctx.date));
    let line = TIME_TOKEN.replace_all(&line, NoExpand(&ctx.time));
    let line = DAY_TOKEN.replace_all(&line, NoExpand(&ctx.day));
    let line = BATTERY_TOKEN.replace_all(&line, NoExpand(&battery));
    let line = CHARGING_TOKEN.replace_all(&line, NoExpand(charging));
    WORD_TOKEN.replace_all(&line, "$1").into_owned()
}

/// Splits the template on newlines and expands each line independently.
pub fn render_template(text: &str, ctx: &RenderContext) -> Vec<String> {
    text.split('\n').map(|line| render_line(line, ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(battery_percent: u8, charging: bool) -> RenderContext {
        RenderContext {
            display_width: 64,
            display_height: 32,
            brightness: 100,
            date: "22 Aug 2025".to_string(),
            time: "10:20:30".to_string(),
            day: "Senin".to_string(),
            battery_percent,
            charging,
            timestamp: 0,
        }
    }

    #[test]
    fn line_without_tokens_passes_through() {
        let ctx = ctx(73, false);
        assert_eq!(render_line("Hello, World!", &ctx), "Hello, World!");
        assert_eq!(render_line("", &ctx), "");
    }

    #[test]
    fn clock_tokens_expand() {
        let ctx = ctx(73, false);
        assert_eq!(render_line("#date", &ctx), "22 Aug 2025");
        assert_eq!(render_line("#time", &ctx), "10:20:30");
        assert_eq!(render_line("#day", &ctx), "Senin");
    }

    #[test]
    fn battery_token_includes_charging_suffix() {
        assert_eq!(render_line("#battery", &ctx(73, true)), "73% (charging)");
        assert_eq!(render_line("#battery", &ctx(73, false)), "73%");
    }

    #[test]
    fn charging_token_expands_to_state() {
        assert_eq!(render_line("#charging", &ctx(50, true)), "Charging");
        assert_eq!(render_line("#charging", &ctx(50, false)), "Not charging");
    }

    #[test]
    fn at_word_renders_bare_word() {
        let ctx = ctx(73, false);
        assert_eq!(render_line("@hello", &ctx), "hello");
        assert_eq!(render_line("@Status: Online", &ctx), "Status: Online");
    }

    #[test]
    fn tokens_are_case_insensitive() {
        let ctx = ctx(73, false);
        assert_eq!(render_line("#DATE", &ctx), "22 Aug 2025");
        assert_eq!(render_line("#Time", &ctx), "10:20:30");
        assert_eq!(render_line("#BaTtErY", &ctx), "73%");
    }

    #[test]
    fn tokens_expand_anywhere_and_repeatedly() {
        let ctx = ctx(73, false);
        assert_eq!(
            render_line("now #time, again #time.", &ctx),
            "now 10:20:30, again 10:20:30."
        );
        assert_eq!(render_line("a @b c @d", &ctx), "a b c d");
    }

    #[test]
    fn unknown_hash_words_stay_literal() {
        let ctx = ctx(73, false);
        assert_eq!(render_line("#foo #", &ctx), "#foo #");
    }

    #[test]
    fn template_splits_lines_and_expands_each() {
        let ctx = ctx(73, false);
        assert_eq!(
            render_template("#day\n@Status: Online", &ctx),
            vec!["Senin".to_string(), "Status: Online".to_string()]
        );
        assert_eq!(render_template("", &ctx), vec!["".to_string()]);
    }
}
