//! Media kind detection and batch inspection
//!
//! A single file is classified the way the upload widget would accept
//! it; a directory is walked and summarized per kind so a batch can be
//! sanity-checked before upload.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use walkdir::WalkDir;

use crate::core::{Action, Context, Module, PromptKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileKind {
    Image,
    Audio,
    Video,
    Csv,
    Text,
    Model,
    Media,
}

impl FileKind {
    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Image => "Image",
            FileKind::Audio => "Audio",
            FileKind::Video => "Video",
            FileKind::Csv => "CSV",
            FileKind::Text => "Text",
            FileKind::Model => "3D Model",
            FileKind::Media => "Media",
        }
    }

    /// Classify a file by extension. Checks run in the same order the
    /// upload widget matches MIME families: image, audio, video, csv,
    /// text (incl. pdf), 3d model. Anything else is generic Media.
    pub fn detect(path: &Path) -> FileKind {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "avif" | "bmp" | "ico" => {
                FileKind::Image
            }
            "mp3" | "wav" | "ogg" | "oga" | "flac" | "m4a" | "aac" => FileKind::Audio,
            "mp4" | "webm" | "mov" | "avi" | "mkv" | "m4v" => FileKind::Video,
            "csv" => FileKind::Csv,
            "txt" | "md" | "html" | "css" | "pdf" => FileKind::Text,
            "glb" | "gltf" | "obj" | "fbx" | "stl" => FileKind::Model,
            _ => FileKind::Media,
        }
    }
}

/// Summary of a file or directory handed to the media prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub root: PathBuf,
    pub counts: BTreeMap<FileKind, usize>,
    pub has_metadata_csv: bool,
    pub total: usize,
}

impl BatchReport {
    pub fn count(&self, kind: FileKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// Inspect a path typed into the media prompt. A plain file produces a
/// one-entry report; a directory is walked recursively, skipping
/// dotfiles.
pub fn scan(path: &Path) -> Result<BatchReport> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let mut counts: BTreeMap<FileKind, usize> = BTreeMap::new();
    let mut total = 0usize;

    if meta.is_file() {
        *counts.entry(FileKind::detect(path)).or_insert(0) += 1;
        total = 1;
    } else if meta.is_dir() {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            *counts.entry(FileKind::detect(entry.path())).or_insert(0) += 1;
            total += 1;
        }
    } else {
        bail!("{} is neither a file nor a directory", path.display());
    }

    let has_metadata_csv = counts.get(&FileKind::Csv).copied().unwrap_or(0) > 0;
    Ok(BatchReport {
        root: path.to_path_buf(),
        counts,
        has_metadata_csv,
        total,
    })
}

/// Overlay showing a [`BatchReport`].
pub struct MediaInspector {
    report: BatchReport,
}

impl MediaInspector {
    pub fn new(report: BatchReport) -> Self {
        Self { report }
    }
}

impl Module for MediaInspector {
    fn title(&self) -> String {
        "Media batch".to_string()
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Context) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::CloseOverlay,
            KeyCode::Char('o') => Action::OpenPrompt(PromptKind::MediaPath),
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &Context) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(Style::default().fg(Color::Cyan));

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Path: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.report.root.display().to_string()),
            ]),
            Line::default(),
        ];

        if self.report.total == 0 {
            lines.push(Line::from(Span::styled(
                "No files found",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (kind, count) in &self.report.counts {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<10}", kind.label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(count.to_string()),
            ]));
        }

        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Total: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} files", self.report.total),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        let metadata_note = if self.report.has_metadata_csv {
            Span::styled("metadata CSV present", Style::default().fg(Color::Green))
        } else {
            Span::styled("no metadata CSV", Style::default().fg(Color::Yellow))
        };
        lines.push(Line::from(metadata_note));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "o inspect another path · esc close",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
