use chrono::Local;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Reason;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::state::UiState;
use crate::controller::submission::{SubmissionController, SubmitOutcome};
use crate::ui::form::{date_preview, FormField, FormMessage, FormModel};
use crate::ui::render::{result_view, show_result_view, ResultView, RESULT_VIEWPORT_SIZE};

const FORM_WIDTH: f32 = 384.0;
const REASON_PLACEHOLDER: &str = "Reason for the vacation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

impl StatusBanner {
    fn from_error(error: &UiError) -> Self {
        Self {
            severity: StatusBannerSeverity::Error,
            message: format!("{}: {}", err_label(error.category()), error.message()),
        }
    }
}

pub struct VacationPlannerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    form: FormModel,
    controller: SubmissionController,
    status_banner: Option<StatusBanner>,
    pending_focus: Option<FormField>,
    // Rebuilt only when the controller state changes.
    view: (UiState, ResultView),
}

impl VacationPlannerApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, form: FormModel) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            form,
            controller: SubmissionController::default(),
            status_banner: None,
            pending_focus: Some(FormField::Destination),
            view: (UiState::default(), ResultView::Welcome),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.controller.handle_event(event);
        }
    }

    fn refresh_view(&mut self) {
        let state = self.controller.state();
        if &self.view.0 != state {
            self.view = (state.clone(), result_view(state));
        }
    }

    fn try_submit(&mut self) {
        let today = Local::now().date_naive();
        match self.controller.submit(&self.form, today, &self.cmd_tx) {
            SubmitOutcome::Queued(submission) => {
                tracing::debug!(%submission, "plan request queued");
                self.status_banner = None;
            }
            SubmitOutcome::Invalid(failure) => {
                let error = UiError::new(
                    UiErrorCategory::Validation,
                    UiErrorContext::FormValidation,
                    failure.to_string(),
                );
                self.status_banner = Some(StatusBanner::from_error(&error));
                self.pending_focus = Some(failure.field);
            }
            SubmitOutcome::AlreadyBusy => {}
            // The result viewport reports dispatch failures.
            SubmitOutcome::DispatchFailed(_) => self.status_banner = None,
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn form_text_field(
        ui: &mut egui::Ui,
        enabled: bool,
        id: &'static str,
        label: &str,
        hint: &str,
        value: &mut String,
        should_focus: bool,
    ) -> egui::Response {
        ui.label(egui::RichText::new(label).strong());
        let edit = egui::TextEdit::singleline(value)
            .id_salt(id)
            .hint_text(
                egui::RichText::new(hint)
                    .color(ui.visuals().weak_text_color().gamma_multiply(0.85)),
            )
            .desired_width(f32::INFINITY);

        let width = ui.available_width();
        let response = ui.add_enabled_ui(enabled, |ui| ui.add_sized([width, 34.0], edit)).inner;
        if should_focus && enabled {
            response.request_focus();
        }
        response
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let enabled = self.controller.state().controls_enabled();
        let focus = self.pending_focus.take();

        ui.label(egui::RichText::new("Vacation.ai").size(30.0).strong());
        ui.label(
            egui::RichText::new("An AI assistant to plan your vacation.")
                .size(17.0)
                .color(ui.visuals().weak_text_color()),
        );
        ui.add_space(16.0);

        self.show_status_banner(ui);

        let mut destination = self.form.destination().to_string();
        let response = Self::form_text_field(
            ui,
            enabled,
            "vacation_destination",
            FormField::Destination.label(),
            "Enter the destination",
            &mut destination,
            focus == Some(FormField::Destination),
        );
        let mut submit_requested =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if destination != self.form.destination() {
            self.form.apply(FormMessage::SetDestination(destination));
        }
        ui.add_space(10.0);

        ui.columns(2, |columns| {
            for (column, field) in columns
                .iter_mut()
                .zip([FormField::StartDate, FormField::EndDate])
            {
                let (id, current) = match field {
                    FormField::StartDate => ("vacation_start_date", self.form.start_date()),
                    _ => ("vacation_end_date", self.form.end_date()),
                };
                let mut value = current.to_string();
                let response = Self::form_text_field(
                    column,
                    enabled,
                    id,
                    field.label(),
                    "YYYY-MM-DD",
                    &mut value,
                    focus == Some(field),
                );
                submit_requested |=
                    response.lost_focus() && column.input(|i| i.key_pressed(egui::Key::Enter));
                column.label(
                    egui::RichText::new(date_preview(&value))
                        .small()
                        .color(column.visuals().weak_text_color()),
                );
                if value != current {
                    let message = match field {
                        FormField::StartDate => FormMessage::SetStartDate(value),
                        _ => FormMessage::SetEndDate(value),
                    };
                    self.form.apply(message);
                }
            }
        });
        ui.add_space(10.0);

        ui.label(egui::RichText::new(FormField::Reason.label()).strong());
        let mut reason = self.form.reason();
        ui.add_enabled_ui(enabled, |ui| {
            egui::ComboBox::from_id_salt("vacation_reason")
                .width(ui.available_width())
                .selected_text(reason.map(Reason::label).unwrap_or(REASON_PLACEHOLDER))
                .show_ui(ui, |ui| {
                    for option in Reason::ALL {
                        ui.selectable_value(&mut reason, Some(option), option.label());
                    }
                });
        });
        if reason != self.form.reason() {
            self.form.apply(FormMessage::SetReason(reason));
        }
        ui.add_space(16.0);

        let submit = egui::Button::new(egui::RichText::new("Submit").strong().size(16.0))
            .min_size(egui::vec2(ui.available_width(), 38.0));
        if ui.add_enabled(enabled, submit).clicked() {
            submit_requested = true;
        }

        if submit_requested && enabled {
            self.try_submit();
        }

        ui.add_space(12.0);
        ui.label(
            egui::RichText::new(format!("Status: {}", self.controller.status()))
                .small()
                .color(ui.visuals().weak_text_color()),
        );
    }

    fn show_result_panel(&mut self, ui: &mut egui::Ui) {
        self.refresh_view();
        let view = &self.view.1;
        let mut dismiss_requested = false;

        egui::Frame::NONE
            .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
            .corner_radius(12.0)
            .inner_margin(egui::Margin::same(20))
            .show(ui, |ui| {
                ui.set_min_size(RESULT_VIEWPORT_SIZE);
                ui.set_max_size(RESULT_VIEWPORT_SIZE);
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| show_result_view(ui, view));
                if matches!(view, ResultView::Failed { .. }) {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Max), |ui| {
                        if ui.button("Dismiss").clicked() {
                            dismiss_requested = true;
                        }
                    });
                }
            });

        if dismiss_requested {
            self.controller.dismiss_error();
        }
    }
}

impl eframe::App for VacationPlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(24.0);
                    ui.horizontal_top(|ui| {
                        ui.add_space(24.0);
                        ui.vertical(|ui| {
                            ui.set_width(FORM_WIDTH);
                            self.show_form(ui);
                        });
                        ui.add_space(32.0);
                        ui.vertical(|ui| self.show_result_panel(ui));
                    });
                });
        });

        if self.controller.state().is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

impl Drop for VacationPlannerApp {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}
