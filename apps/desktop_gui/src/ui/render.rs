//! Result viewport: a pure view derivation from `UiState` plus the egui
//! drawing for each view.

use eframe::egui;

use crate::controller::events::err_label;
use crate::controller::state::UiState;
use crate::ui::markdown::{Block, ColumnAlign, ListItem, PlanDocument, Span};

pub const RESULT_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(448.0, 512.0);
pub const WELCOME_TITLE: &str = "Welcome to Vacation.ai";
pub const WELCOME_SUBTITLE: &str = "Start planning your vacation with us.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Busy,
    Failed { title: String, detail: String },
    Plan(PlanDocument),
    Welcome,
}

/// Exactly one view per state; busy wins over anything stored.
pub fn result_view(state: &UiState) -> ResultView {
    if state.is_loading() {
        return ResultView::Busy;
    }
    if let Some(error) = state.error() {
        return ResultView::Failed {
            title: format!("{} error", err_label(error.category())),
            detail: format!("{}\n\n{}", error.headline(), error.message()),
        };
    }
    match state.result() {
        Some(plan) => ResultView::Plan(PlanDocument::parse(plan)),
        None => ResultView::Welcome,
    }
}

pub fn show_result_view(ui: &mut egui::Ui, view: &ResultView) {
    match view {
        ResultView::Busy => {
            ui.centered_and_justified(|ui| {
                ui.add(egui::Spinner::new().size(40.0));
            });
        }
        ResultView::Failed { title, detail } => {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.25);
                ui.label(
                    egui::RichText::new(title)
                        .strong()
                        .size(22.0)
                        .color(ui.visuals().error_fg_color),
                );
                ui.add_space(8.0);
                ui.label(detail);
                ui.add_space(8.0);
                ui.weak("Adjust the form and submit again.");
            });
        }
        ResultView::Plan(document) => show_plan_document(ui, document),
        ResultView::Welcome => {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.38);
                ui.label(egui::RichText::new(WELCOME_TITLE).strong().size(26.0));
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(WELCOME_SUBTITLE)
                        .size(18.0)
                        .color(ui.visuals().weak_text_color()),
                );
            });
        }
    }
}

fn show_plan_document(ui: &mut egui::Ui, document: &PlanDocument) {
    ui.style_mut().spacing.item_spacing = egui::vec2(6.0, 8.0);
    show_blocks(ui, &document.blocks, "plan");
}

fn show_blocks(ui: &mut egui::Ui, blocks: &[Block], path: &str) {
    for (index, block) in blocks.iter().enumerate() {
        show_block(ui, block, &format!("{path}.{index}"));
    }
}

fn show_block(ui: &mut egui::Ui, block: &Block, path: &str) {
    match block {
        Block::Heading { level, spans } => {
            let size = match level {
                1 => 26.0,
                2 => 22.0,
                3 => 19.0,
                _ => 17.0,
            };
            ui.horizontal_wrapped(|ui| {
                show_inline(ui, spans, |text| text.size(size).strong());
            });
        }
        Block::Paragraph(spans) => show_spans(ui, spans),
        Block::List { start, items } => show_list(ui, *start, items, path),
        Block::Quote(blocks) => {
            egui::Frame::NONE
                .fill(ui.visuals().faint_bg_color)
                .stroke(egui::Stroke::new(
                    1.0,
                    ui.visuals().widgets.noninteractive.bg_stroke.color,
                ))
                .corner_radius(6.0)
                .inner_margin(egui::Margin::symmetric(10, 6))
                .show(ui, |ui| show_blocks(ui, blocks, path));
        }
        Block::Code { code, .. } => {
            egui::Frame::NONE
                .fill(ui.visuals().extreme_bg_color)
                .corner_radius(6.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(code.trim_end()).monospace());
                });
        }
        Block::Table {
            alignments,
            header,
            rows,
        } => {
            egui::Grid::new(path)
                .striped(true)
                .spacing(egui::vec2(12.0, 6.0))
                .show(ui, |ui| {
                    for (column, cell) in header.iter().enumerate() {
                        show_cell(ui, cell, alignment_at(alignments, column), true);
                    }
                    ui.end_row();
                    for row in rows {
                        for (column, cell) in row.iter().enumerate() {
                            show_cell(ui, cell, alignment_at(alignments, column), false);
                        }
                        ui.end_row();
                    }
                });
        }
        Block::Rule => {
            ui.separator();
        }
    }
}

fn show_list(ui: &mut egui::Ui, start: Option<u64>, items: &[ListItem], path: &str) {
    for (index, item) in items.iter().enumerate() {
        let marker = match (item.checked, start) {
            (Some(true), _) => "☑".to_string(),
            (Some(false), _) => "☐".to_string(),
            (None, Some(first)) => format!("{}.", first + index as u64),
            (None, None) => "•".to_string(),
        };
        ui.horizontal_top(|ui| {
            ui.label(marker);
            ui.vertical(|ui| show_blocks(ui, &item.blocks, &format!("{path}.{index}")));
        });
    }
}

fn show_cell(ui: &mut egui::Ui, cell: &[Span], align: ColumnAlign, header: bool) {
    let layout = match align {
        ColumnAlign::Right => egui::Layout::right_to_left(egui::Align::Center),
        ColumnAlign::Center => egui::Layout::top_down(egui::Align::Center),
        ColumnAlign::None | ColumnAlign::Left => egui::Layout::left_to_right(egui::Align::Center),
    };
    ui.with_layout(layout, |ui| {
        ui.horizontal_wrapped(|ui| {
            show_inline(ui, cell, |text| if header { text.strong() } else { text });
        });
    });
}

fn alignment_at(alignments: &[ColumnAlign], column: usize) -> ColumnAlign {
    alignments.get(column).copied().unwrap_or(ColumnAlign::None)
}

fn show_spans(ui: &mut egui::Ui, spans: &[Span]) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        show_inline(ui, spans, |text| text);
    });
}

/// Draws a run of spans; links stay clickable in headings and table cells too.
fn show_inline(
    ui: &mut egui::Ui,
    spans: &[Span],
    style: impl Fn(egui::RichText) -> egui::RichText,
) -> Vec<egui::Response> {
    spans
        .iter()
        .map(|span| {
            let text = style(span_text(span));
            match &span.style.link {
                Some(target) => ui.hyperlink_to(text, target).on_hover_text(target.as_str()),
                None => ui.label(text),
            }
        })
        .collect()
}

fn span_text(span: &Span) -> egui::RichText {
    let mut text = egui::RichText::new(&span.text);
    if span.style.strong {
        text = text.strong();
    }
    if span.style.emphasis {
        text = text.italics();
    }
    if span.style.strikethrough {
        text = text.strikethrough();
    }
    if span.style.code {
        text = text.code();
    }
    text
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
