//! Serializer - Indented DDL text emission with block commit/rollback
//!
//! Every nested block writes into its own buffer. When the block ends, the
//! buffer is appended to its parent only if something inside it was
//! committed, so empty `Keyword { }` shells never reach the output.

use crate::config::DdlWriterConfig;
use crate::encode::format_value;
use crate::error::{DdlError, DdlResult};
use ddl_model::Value;
use std::io::Write;
use unicode_segmentation::UnicodeSegmentation;

/// Maximum number of nested blocks
pub const MAX_BLOCK_DEPTH: usize = 32;

/// What a block encloses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Plain rollback scope without delimiters
    Plain,
    /// `[` ... `]`
    Attributes,
    /// `{` ... `}`
    Content,
}

/// Handle returned when a block is opened; must be passed back to close it
#[must_use = "an opened block must be closed"]
#[derive(Debug, PartialEq, Eq)]
pub struct BlockToken {
    depth: usize,
    kind: BlockKind,
}

#[derive(Debug)]
struct Block {
    kind: BlockKind,
    text: String,
    committed: bool,
    /// Column when the block was opened, restored on rollback
    column: usize,
    /// Indentation when the block was opened, restored on rollback
    indent: usize,
}

impl Block {
    fn new(kind: BlockKind, column: usize, indent: usize) -> Self {
        Self {
            kind,
            text: String::new(),
            committed: false,
            column,
            indent,
        }
    }
}

/// Stateful DDL text emitter
pub struct Serializer<W: Write> {
    writer: W,
    config: DdlWriterConfig,
    /// Root buffer followed by the open blocks
    blocks: Vec<Block>,
    /// Current indentation in spaces
    indent: usize,
    /// Width of the current line so far
    column: usize,
}

fn width(text: &str) -> usize {
    text.graphemes(true).count()
}

impl<W: Write> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, DdlWriterConfig::default())
    }

    pub fn with_config(writer: W, config: DdlWriterConfig) -> Self {
        let indent = config.initial_indent;
        Self {
            writer,
            config,
            blocks: vec![Block::new(BlockKind::Plain, 0, indent)],
            indent,
            column: 0,
        }
    }

    pub fn config(&self) -> &DdlWriterConfig {
        &self.config
    }

    /// Number of open blocks
    pub fn depth(&self) -> usize {
        self.blocks.len() - 1
    }

    pub fn column(&self) -> usize {
        self.column
    }

    fn current(&mut self) -> &mut Block {
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    fn commit(&mut self) {
        self.current().committed = true;
    }

    /// Append raw text to the current line, indenting a fresh line first
    fn emit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.column == 0 && self.indent > 0 {
            let pad = " ".repeat(self.indent);
            self.current().text.push_str(&pad);
            self.column = self.indent;
        }
        self.current().text.push_str(text);
        self.column += width(text);
    }

    fn newline(&mut self) {
        self.current().text.push('\n');
        self.column = 0;
    }

    /// Break the current line, dropping trailing blanks
    fn wrap(&mut self) {
        let block = self.current();
        let trimmed = block.text.trim_end_matches(' ').len();
        block.text.truncate(trimmed);
        self.newline();
    }

    fn at_line_start(&self) -> bool {
        self.column == 0
    }

    // =========================================================================
    // Writing
    // =========================================================================

    /// Write text and commit, wrapping at blanks inside `text` once the line
    /// would exceed the configured width
    pub fn write(&mut self, text: &str) {
        for (i, piece) in text.split_inclusive(' ').enumerate() {
            let piece_width = width(piece.trim_end_matches(' '));
            if i > 0
                && self.column > self.indent
                && self.column + piece_width > self.config.line_width
            {
                self.wrap();
            }
            self.emit(piece);
        }
        self.commit();
    }

    /// Write an atomic token and commit; never wrapped
    pub fn write_token(&mut self, token: &str) {
        self.emit(token);
        self.commit();
    }

    /// Write text without committing the current block
    pub fn write_no_commit(&mut self, text: &str) {
        self.emit(text);
    }

    /// Write a full line and commit
    pub fn write_line(&mut self, text: &str) {
        self.emit(text);
        self.newline();
        self.commit();
    }

    /// Write a full line that is rolled back with its block unless
    /// something else in the block commits
    pub fn write_line_no_commit(&mut self, text: &str) {
        self.emit(text);
        self.newline();
    }

    /// Terminate a partially written line without committing
    pub fn close_up_line(&mut self) {
        if !self.at_line_start() {
            self.newline();
        }
    }

    /// Write `// text` lines, one per input line, when comments are enabled
    pub fn write_comment(&mut self, comment: &str) {
        if !self.config.write_comments || comment.is_empty() {
            return;
        }
        self.close_up_line();
        for line in comment.lines() {
            self.write_line(&format!("// {}", line));
        }
    }

    /// Write `Name = value` on its own line
    pub fn write_simple_attribute(&mut self, name: &str, value: &Value) {
        self.close_up_line();
        self.write_line(&format!("{} = {}", name, format_value(value)));
    }

    pub fn indent(&mut self) {
        self.indent += self.config.indent;
    }

    pub fn unindent(&mut self) {
        self.indent = self
            .indent
            .saturating_sub(self.config.indent)
            .max(self.config.initial_indent);
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Open a plain rollback scope
    pub fn begin_block(&mut self) -> DdlResult<BlockToken> {
        self.push_block(BlockKind::Plain)
    }

    /// Close a plain scope; returns whether anything was committed in it
    pub fn end_block(&mut self, token: BlockToken) -> DdlResult<bool> {
        self.check_open(&token, BlockKind::Plain)?;
        self.pop_block()
    }

    /// Open an attribute block `[`
    pub fn begin_attributes(&mut self) -> DdlResult<BlockToken> {
        self.close_up_line();
        let token = self.push_block(BlockKind::Attributes)?;
        self.write_line_no_commit("[");
        self.indent();
        Ok(token)
    }

    /// Close an attribute block with `]`, or drop it if empty
    pub fn end_attributes(&mut self, token: BlockToken) -> DdlResult<bool> {
        self.check_open(&token, BlockKind::Attributes)?;
        self.unindent();
        self.close_end_delimiter("]");
        self.pop_block()
    }

    /// Open a content block `{`
    pub fn begin_content(&mut self) -> DdlResult<BlockToken> {
        self.close_up_line();
        let token = self.push_block(BlockKind::Content)?;
        self.write_line_no_commit("{");
        self.indent();
        Ok(token)
    }

    /// Open a content block preceded by a name line, both rolled back if the
    /// block stays empty
    pub fn begin_content_named(&mut self, name: &str) -> DdlResult<BlockToken> {
        self.close_up_line();
        let token = self.push_block(BlockKind::Content)?;
        self.write_line_no_commit(name);
        self.write_line_no_commit("{");
        self.indent();
        Ok(token)
    }

    /// Close a content block with `}`, or drop it if empty
    pub fn end_content(&mut self, token: BlockToken) -> DdlResult<bool> {
        self.check_open(&token, BlockKind::Content)?;
        self.unindent();
        self.close_end_delimiter("}");
        self.pop_block()
    }

    fn close_end_delimiter(&mut self, delimiter: &str) {
        if self.current().committed {
            self.close_up_line();
            self.write_line_no_commit(delimiter);
        }
    }

    fn push_block(&mut self, kind: BlockKind) -> DdlResult<BlockToken> {
        if self.depth() >= MAX_BLOCK_DEPTH {
            return Err(DdlError::NestingExhausted {
                max: MAX_BLOCK_DEPTH,
            });
        }
        self.blocks.push(Block::new(kind, self.column, self.indent));
        Ok(BlockToken {
            depth: self.depth(),
            kind,
        })
    }

    fn check_open(&self, token: &BlockToken, kind: BlockKind) -> DdlResult<()> {
        if self.depth() == 0 {
            return Err(DdlError::NestingUnderflow);
        }
        let open = &self.blocks[self.blocks.len() - 1];
        if token.depth != self.depth() || token.kind != kind || open.kind != kind {
            return Err(DdlError::BlockMismatch {
                expected: token.depth,
                found: self.depth(),
            });
        }
        Ok(())
    }

    fn pop_block(&mut self) -> DdlResult<bool> {
        let block = self.blocks.pop().ok_or(DdlError::NestingUnderflow)?;
        if block.committed {
            let parent = self.current();
            parent.text.push_str(&block.text);
            parent.committed = true;
        } else {
            tracing::trace!(kind = ?block.kind, bytes = block.text.len(), "rolled back empty block");
            self.column = block.column;
            self.indent = block.indent;
        }
        Ok(block.committed)
    }

    /// Write everything buffered to the underlying writer, flush it and
    /// hand it back
    pub fn finish(mut self) -> DdlResult<W> {
        if self.depth() != 0 {
            return Err(DdlError::BlockMismatch {
                expected: 0,
                found: self.depth(),
            });
        }
        self.close_up_line();
        let root = &self.blocks[0];
        self.writer.write_all(root.text.as_bytes())?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}
