//! Immutable text-block algebra used by the generators.
//!
//! A block is an ordered list of lines plus an indentation amount. The four
//! primitives (`indent`, `width`/`height`, `hcat`, `vcat`) plus the two joins
//! are pure: every operation returns a new block and never inspects anything
//! beyond its inputs. Widths are measured in characters, not bytes.

/// An immutable rectangle-ish region of text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
    indent: usize,
}

impl Block {
    /// The block with no lines.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single-line block.
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            indent: 0,
        }
    }

    /// A block from pre-split lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines, indent: 0 }
    }

    /// A block from a text fragment, split on newlines.
    pub fn text(text: &str) -> Self {
        if text.is_empty() {
            return Self::empty();
        }
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            indent: 0,
        }
    }

    /// A one-line blank separator.
    pub fn blank() -> Self {
        Self::line("")
    }

    /// The block's lines, without indentation applied.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns a block with the same lines and indentation increased by `n`.
    pub fn indent(&self, n: usize) -> Self {
        Self {
            lines: self.lines.clone(),
            indent: self.indent + n,
        }
    }

    /// Number of lines.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Indentation plus the longest line, in characters. Zero for an empty
    /// block.
    pub fn width(&self) -> usize {
        if self.lines.is_empty() {
            return 0;
        }
        self.indent
            + self
                .lines
                .iter()
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Appends `suffix` to the last line, or creates one for an empty block.
    pub fn suffix_last(&self, suffix: &str) -> Self {
        let mut lines = self.lines.clone();
        match lines.last_mut() {
            Some(last) => last.push_str(suffix),
            None => lines.push(suffix.to_string()),
        }
        Self {
            lines,
            indent: self.indent,
        }
    }

    /// Horizontal concatenation.
    ///
    /// Each block is squared off to its own width (indentation applied, lines
    /// right-padded) and padded at the bottom with blank lines of that width
    /// up to the tallest input, then rows are joined left-to-right. The
    /// result carries zero indentation because the padding has already been
    /// materialized.
    pub fn hcat<'a, I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let blocks: Vec<&Block> = blocks.into_iter().collect();
        let height = blocks.iter().map(|b| b.height()).max().unwrap_or(0);
        if height == 0 {
            return Self::empty();
        }

        let mut rows = vec![String::new(); height];
        for block in blocks {
            let width = block.width();
            let padded = block.squared_lines();
            for (row_index, row) in rows.iter_mut().enumerate() {
                match padded.get(row_index) {
                    Some(line) => row.push_str(line),
                    None => row.extend(std::iter::repeat(' ').take(width)),
                }
            }
        }
        Self {
            lines: rows,
            indent: 0,
        }
    }

    /// Vertical concatenation: each block's indented lines in order, no
    /// padding.
    pub fn vcat<'a, I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let mut lines = Vec::new();
        for block in blocks {
            lines.extend(block.indented_lines());
        }
        Self { lines, indent: 0 }
    }

    /// `hcat` with `delimiter` interleaved between consecutive blocks.
    pub fn hjoin<'a, I>(delimiter: &Block, blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a Block>,
    {
        Self::hcat(&Self::interleave(delimiter, blocks))
    }

    /// `vcat` with `delimiter` interleaved between consecutive blocks.
    pub fn vjoin<'a, I>(delimiter: &Block, blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a Block>,
    {
        Self::vcat(&Self::interleave(delimiter, blocks))
    }

    /// Final text: indented lines joined by newlines.
    pub fn render(&self) -> String {
        self.indented_lines().collect::<Vec<_>>().join("\n")
    }

    fn interleave<'a, I>(delimiter: &Block, blocks: I) -> Vec<Block>
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let mut out = Vec::new();
        for block in blocks {
            if !out.is_empty() {
                out.push(delimiter.clone());
            }
            out.push(block.clone());
        }
        out
    }

    fn indented_lines(&self) -> impl Iterator<Item = String> + '_ {
        let pad = " ".repeat(self.indent);
        self.lines.iter().map(move |line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
    }

    fn squared_lines(&self) -> Vec<String> {
        let width = self.width();
        self.indented_lines()
            .map(|line| {
                let len = line.chars().count();
                let mut line = line;
                line.extend(std::iter::repeat(' ').take(width - len.min(width)));
                line
            })
            .collect()
    }
}

// Note on `indented_lines`: blank lines stay blank rather than becoming runs
// of spaces; `squared_lines` re-pads them when horizontal composition needs
// true rectangles.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_indentation_and_longest_line() {
        let block = Block::from_lines(vec!["ab".into(), "abcd".into()]).indent(3);
        assert_eq!(block.width(), 7);
        assert_eq!(block.height(), 2);
        assert_eq!(Block::empty().width(), 0);
    }

    #[test]
    fn hcat_pads_shorter_blocks_with_blank_rows_of_their_width() {
        let left = Block::from_lines(vec!["AB".into(), "CD".into()]);
        let right = Block::line("X");
        let joined = Block::hcat([&left, &right]);
        assert_eq!(joined.render(), "ABX\nCD ");
    }

    #[test]
    fn hcat_applies_indentation_before_composing() {
        let left = Block::line("a").indent(2);
        let right = Block::line("b");
        assert_eq!(Block::hcat([&left, &right]).render(), "  ab");
    }

    #[test]
    fn vcat_emits_indented_lines_without_padding() {
        let top = Block::line("head");
        let body = Block::from_lines(vec!["x".into(), "y".into()]).indent(2);
        let joined = Block::vcat([&top, &body]);
        assert_eq!(joined.render(), "head\n  x\n  y");
        assert_eq!(joined.height(), 3);
    }

    #[test]
    fn joins_interleave_the_delimiter() {
        let a = Block::line("a");
        let b = Block::line("b");
        assert_eq!(Block::hjoin(&Block::line(" | "), [&a, &b]).render(), "a | b");
        assert_eq!(
            Block::vjoin(&Block::blank(), [&a, &b]).render(),
            "a\n\nb"
        );
    }

    #[test]
    fn empty_inputs_produce_the_empty_block() {
        assert_eq!(Block::hcat([] as [&Block; 0]), Block::empty());
        assert_eq!(Block::vcat([] as [&Block; 0]), Block::empty());
    }

    #[test]
    fn suffix_last_lands_on_the_final_line() {
        let block = Block::from_lines(vec!["{".into(), "}".into()]).suffix_last(";");
        assert_eq!(block.render(), "{\n};");
        assert_eq!(Block::empty().suffix_last(";").render(), ";");
    }
}
