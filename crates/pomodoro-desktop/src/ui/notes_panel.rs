use eframe::egui;
use pomodoro_core::NotesManager;

/// Editable copy of the notes file plus its save state.
pub struct NotesPanel {
    text: String,
    dirty: bool,
    autosave: bool,
    status: Option<String>,
}

impl NotesPanel {
    pub fn load(notes: &NotesManager, autosave: bool) -> Self {
        let (text, status) = match notes.load() {
            Ok(text) => (text, None),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load notes");
                (String::new(), Some(format!("Could not load notes: {e}")))
            }
        };
        Self {
            text,
            dirty: false,
            autosave,
            status,
        }
    }

    /// Write pending edits. Does nothing when the text is unchanged.
    pub fn flush(&mut self, notes: &NotesManager) {
        if !self.dirty {
            return;
        }
        match notes.save(&self.text) {
            Ok(()) => {
                self.dirty = false;
                self.status = Some("Saved".to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save notes");
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, notes: &NotesManager) {
        ui.horizontal(|ui| {
            ui.strong("Notes");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(self.dirty, egui::Button::new("Save"))
                    .clicked()
                {
                    self.flush(notes);
                }
                if let Some(status) = &self.status {
                    ui.weak(status);
                }
            });
        });

        let response = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.text)
                        .hint_text("What are you working on?")
                        .desired_width(f32::INFINITY)
                        .desired_rows(8),
                )
            })
            .inner;

        if response.changed() {
            self.dirty = true;
            self.status = None;
        }
        if response.lost_focus() && self.autosave {
            self.flush(notes);
        }
    }
}
