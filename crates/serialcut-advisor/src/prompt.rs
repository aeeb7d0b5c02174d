use serialcut_core::SerialcutError;
use serialcut_splitters::Paragraph;

/// Appended when the numbered story text is cut short.
pub const TRUNCATION_MARKER: &str = "\n\n[...text truncated for length...]";

const TEMPLATE: &str = r#"Analyze this story and identify natural break point(s) for splitting into reading chunks.

Target: ~{{target_words}} words per chunk (flexible)
Total: ~{{total_words}} words, {{paragraph_count}} paragraphs
Suggested chunks: ~{{suggested_chunks}}

CRITICAL PRIORITIES - Look for these IN ORDER:
1. **EXPLICIT SCENE BREAKS** - Paragraphs containing ONLY "--", "* * *", or "═══" (these are MANDATORY breaks, use them even if far from target)
2. **Scene transitions** - Character moves to completely different location or significant time passage
3. **Resolution of conflicts** - After action sequence/fight ENDS and before next begins
4. **Perspective shifts** - POV changes to different character
5. **Completed emotional arcs** - After character completes internal transformation, NOT during it

EXPLICITLY AVOID (these are BAD breaks):
- Mid-combat: Character actively fighting/fleeing
- Mid-dialogue: Characters in conversation
- Mid-transformation: Character in middle of emotional/psychological change
- Mid-climax: During peak of tension (wait for resolution)
- Mid-flashback: Inside parenthetical glimpses or memory sequences

FLEXIBILITY RULES:
- Explicit scene breaks (---, * * *) ALWAYS take priority, even if chunks are unequal
- Can create chunks as small as 2000 words or as large as 8000 words if it hits a proper scene break
- Better to have 2500 + 4500 word split at a real scene break than 3500 + 3500 at a bad break
- If multiple good breaks exist, prefer the one closest to target
- Narrative coherence > word count balance

For each break point:
BREAK_PARA: <number>
REASON: Scene/action that ENDS before break | Scene/action that BEGINS after break

If no breaks needed (story too short): NO_BREAKS_NEEDED

Text with paragraph numbers:
{{numbered_text}}"#;

/// Builds the boundary-analysis prompt for one story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPrompt {
    target_words: usize,
    max_chars: usize,
}

impl BoundaryPrompt {
    pub fn new(target_words: usize, max_chars: usize) -> Self {
        Self {
            target_words: target_words.max(1),
            max_chars,
        }
    }

    /// Suggested number of chunks: `max(1, round(total / target))`.
    pub fn suggested_chunks(&self, total_words: usize) -> usize {
        ((total_words as f64 / self.target_words as f64).round() as usize).max(1)
    }

    /// Every paragraph as `[Para n]` followed by its text, truncated after
    /// `max_chars` characters (not bytes).
    pub fn numbered_text(&self, paragraphs: &[Paragraph<'_>]) -> String {
        let mut out = String::new();
        for p in paragraphs {
            out.push_str(&format!("[Para {}]\n{}\n\n", p.number, p.text));
        }
        if let Some((cut, _)) = out.char_indices().nth(self.max_chars) {
            out.truncate(cut);
            out.push_str(TRUNCATION_MARKER);
        }
        out
    }

    pub fn render(
        &self,
        paragraphs: &[Paragraph<'_>],
        total_words: usize,
    ) -> Result<String, SerialcutError> {
        let values = [
            ("target_words", self.target_words.to_string()),
            ("total_words", total_words.to_string()),
            ("paragraph_count", paragraphs.len().to_string()),
            ("suggested_chunks", self.suggested_chunks(total_words).to_string()),
            ("numbered_text", self.numbered_text(paragraphs)),
        ];
        render(TEMPLATE, &values)
    }
}

/// Fills `{{name}}` placeholders. Substituted values are not rescanned, so
/// story text containing braces passes through untouched.
fn render(template: &str, values: &[(&str, String)]) -> Result<String, SerialcutError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_start = &rest[start + 2..];
        let Some(end) = after_start.find("}}") else {
            output.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let key = after_start[..end].trim();
        let value = values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| SerialcutError::Validation(format!("missing prompt variable: {key}")))?;
        output.push_str(value);
        rest = &after_start[end + 2..];
    }

    output.push_str(rest);
    Ok(output)
}
