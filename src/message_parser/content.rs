//! Payload post-processing applied between an action's closing tag being
//! recognized and its close callback firing.

use std::sync::LazyLock;

use regex::Regex;

use crate::message_parser::types::ActionKind;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches a payload that is, in its entirety, a single fenced code block.
    Regex::new(r"(?s)^\s*```\w*\n(.*?)\n\s*```\s*$").expect("valid regex pattern")
});

/// Remove one outer fenced code-block wrapper
///
/// Models frequently wrap file contents in a markdown fence even though the
/// payload is already delimited by the action tags. The fence is stripped
/// only when the whole payload is a single wrapped block; fences embedded in
/// a larger payload are left alone.
pub fn strip_code_fence(content: &str) -> &str {
    match CODE_FENCE.captures(content) {
        Some(caps) => caps.get(1).map_or(content, |m| m.as_str()),
        None => content,
    }
}

/// Undo HTML escaping of angle brackets in the payload
pub fn unescape_tags(content: &str) -> String {
    content.replace("&lt;", "<").replace("&gt;", ">")
}

/// Final payload post-processing for an action close
///
/// All kinds are trimmed, fence-stripped and unescaped, except file actions
/// targeting a `.md` path: markdown passes through verbatim so literal
/// fenced blocks in the written file survive. File payloads additionally get
/// a trailing newline.
pub fn finalize_content(kind: &ActionKind, file_path: Option<&str>, raw: &str) -> String {
    let trimmed = raw.trim();
    let markdown_target =
        matches!(kind, ActionKind::File) && file_path.is_some_and(|path| path.ends_with(".md"));

    let mut content = if markdown_target {
        trimmed.to_string()
    } else {
        unescape_tags(strip_code_fence(trimmed))
    };

    if matches!(kind, ActionKind::File) {
        content.push('\n');
    }

    content
}

/// Post-processing for a not-yet-closed payload surfaced via action-stream
///
/// Same pipeline as [`finalize_content`] minus the trim and the trailing
/// newline, applied to whatever payload prefix has arrived so far. Only file
/// actions stream, so the markdown exception is keyed off the path alone.
pub fn partial_content(file_path: Option<&str>, raw: &str) -> String {
    if file_path.is_some_and(|path| path.ends_with(".md")) {
        raw.to_string()
    } else {
        unescape_tags(strip_code_fence(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fence_with_language() {
        assert_eq!(strip_code_fence("```rust\nfn main() {}\n```"), "fn main() {}");
    }

    #[test]
    fn test_strip_fence_without_language() {
        assert_eq!(strip_code_fence("```\nplain\n```"), "plain");
    }

    #[test]
    fn test_strip_fence_not_fully_wrapped() {
        let content = "before\n```\ncode\n```";
        assert_eq!(strip_code_fence(content), content);
    }

    #[test]
    fn test_strip_fence_plain_text() {
        assert_eq!(strip_code_fence("no fences here"), "no fences here");
    }

    #[test]
    fn test_unescape_tags() {
        assert_eq!(unescape_tags("&lt;div&gt;hi&lt;/div&gt;"), "<div>hi</div>");
        assert_eq!(unescape_tags("unchanged"), "unchanged");
    }

    #[test]
    fn test_finalize_file() {
        let content = finalize_content(
            &ActionKind::File,
            Some("src/main.rs"),
            "\n```rust\nfn main() {}\n```\n",
        );
        assert_eq!(content, "fn main() {}\n");
    }

    #[test]
    fn test_finalize_markdown_keeps_fence() {
        let content = finalize_content(
            &ActionKind::File,
            Some("README.md"),
            "```md\n# Title\n```",
        );
        assert_eq!(content, "```md\n# Title\n```\n");
    }

    #[test]
    fn test_finalize_shell_no_trailing_newline() {
        let content = finalize_content(&ActionKind::Shell, None, "  npm install  ");
        assert_eq!(content, "npm install");
    }

    #[test]
    fn test_finalize_shell_strips_fence() {
        let content = finalize_content(&ActionKind::Shell, None, "```\nnpm install\n```");
        assert_eq!(content, "npm install");
    }

    #[test]
    fn test_finalize_idempotent() {
        let once = finalize_content(
            &ActionKind::File,
            Some("a.html"),
            "```html\n&lt;p&gt;hi&lt;/p&gt;\n```",
        );
        assert_eq!(once, "<p>hi</p>\n");

        let twice = finalize_content(&ActionKind::File, Some("a.html"), &once);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_partial_matches_final_pipeline() {
        assert_eq!(partial_content(Some("a.txt"), "&lt;x&gt;"), "<x>");
        assert_eq!(partial_content(Some("notes.md"), "&lt;x&gt;"), "&lt;x&gt;");
    }
}
