//! Login, registration and email verification forms
//!
//! Forms only collect input. Validation errors come back from the server as
//! field errors on [`AuthState`] and are rendered under the matching input.

use crate::api::RegisterRequest;
use crate::i18n::{tr, Language, Text};
use crate::state::{AuthState, AuthStatus};
use crate::ui::theme::Theme;
use egui::RichText;

#[derive(Clone, Debug, PartialEq)]
pub enum AuthAction {
    Login { email: String, password: String },
    Register(RegisterRequest),
    Verify(String),
    Resend(String),
    ShowRegister,
    ShowLogin,
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password1: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, Default)]
pub struct VerifyForm {
    pub key: String,
}

/// Single-line input with an accessibility label and an inline field error
fn field(
    ui: &mut egui::Ui,
    theme: &Theme,
    caption: &str,
    access_label: &str,
    value: &mut String,
    password: bool,
    error: Option<&str>,
) -> egui::Response {
    ui.label(RichText::new(caption).size(12.0).color(theme.text_secondary));
    let response = ui.add(
        egui::TextEdit::singleline(value)
            .password(password)
            .desired_width(280.0)
            .id(egui::Id::new(("auth_field", access_label))),
    );
    response.widget_info(|| {
        egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, access_label)
    });
    if let Some(error) = error {
        let shown = ui.label(RichText::new(error).size(12.0).color(theme.error));
        let label = format!("{} error: {}", access_label, error);
        shown.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label));
    }
    response
}

fn submit_button(ui: &mut egui::Ui, theme: &Theme, text: &str, access_label: &str, enabled: bool) -> bool {
    let response = ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(text).strong().color(egui::Color32::WHITE))
            .fill(theme.primary)
            .rounding(theme.button_rounding)
            .min_size(egui::vec2(280.0, 32.0)),
    );
    response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, access_label));
    response.clicked()
}

/// Form-level error or notice above the inputs
fn feedback(ui: &mut egui::Ui, theme: &Theme, auth: &AuthState) {
    if let Some(error) = &auth.error {
        let shown = ui.label(RichText::new(error).color(theme.error));
        let label = format!("Form error: {}", error);
        shown.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label));
    }
    if let Some(notice) = &auth.notice {
        ui.label(RichText::new(notice).color(theme.success));
    }
}

impl LoginForm {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        language: Language,
        auth: &AuthState,
    ) -> Option<AuthAction> {
        let mut action = None;
        let busy = auth.status.is_busy();

        ui.heading(tr(language, Text::Login));
        feedback(ui, theme, auth);

        field(ui, theme, tr(language, Text::Email), "Email input", &mut self.email, false, auth.field_error("email"));
        let password = field(
            ui,
            theme,
            tr(language, Text::Password),
            "Password input",
            &mut self.password,
            true,
            auth.field_error("password"),
        );
        let enter = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.add_space(theme.spacing_sm);
        let ready = !busy && !self.email.trim().is_empty() && !self.password.is_empty();
        if submit_button(ui, theme, tr(language, Text::Login), "Log in", ready) || (enter && ready) {
            action = Some(AuthAction::Login {
                email: self.email.trim().to_string(),
                password: self.password.clone(),
            });
        }
        if busy {
            ui.spinner();
        }

        ui.add_space(theme.spacing_sm);
        if ui.link(tr(language, Text::CreateAccount)).clicked() {
            action = Some(AuthAction::ShowRegister);
        }
        action
    }

    /// Forget the password after a submit attempt
    pub fn clear_secret(&mut self) {
        self.password.clear();
    }
}

impl RegisterForm {
    /// Payload for the current input; names and email are trimmed, passwords kept as typed
    pub fn request(&self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.trim().to_string(),
            password1: self.password1.clone(),
            password2: self.password2.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        language: Language,
        auth: &AuthState,
    ) -> Option<AuthAction> {
        let mut action = None;
        let busy = auth.status.is_busy();

        ui.heading(tr(language, Text::CreateAccount));
        feedback(ui, theme, auth);

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                field(ui, theme, tr(language, Text::FirstName), "First name input", &mut self.first_name, false, auth.field_error("first_name"));
            });
            ui.vertical(|ui| {
                field(ui, theme, tr(language, Text::LastName), "Last name input", &mut self.last_name, false, auth.field_error("last_name"));
            });
        });
        field(ui, theme, tr(language, Text::Email), "Email input", &mut self.email, false, auth.field_error("email"));
        field(ui, theme, tr(language, Text::Password), "Password input", &mut self.password1, true, auth.field_error("password1"));
        field(
            ui,
            theme,
            tr(language, Text::ConfirmPassword),
            "Confirm password input",
            &mut self.password2,
            true,
            auth.field_error("password2"),
        );

        ui.add_space(theme.spacing_sm);
        let ready = !busy
            && !self.email.trim().is_empty()
            && !self.password1.is_empty()
            && !self.password2.is_empty();
        if submit_button(ui, theme, tr(language, Text::Register), "Register", ready) {
            action = Some(AuthAction::Register(self.request()));
        }
        if busy {
            ui.spinner();
        }

        ui.add_space(theme.spacing_sm);
        if ui.link(tr(language, Text::HaveAccount)).clicked() {
            action = Some(AuthAction::ShowLogin);
        }
        action
    }
}

impl VerifyForm {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        language: Language,
        auth: &AuthState,
    ) -> Option<AuthAction> {
        let AuthStatus::AwaitingVerification { email } = &auth.status else {
            return None;
        };
        let mut action = None;

        ui.heading(tr(language, Text::VerifyEmail));
        ui.label(RichText::new(email).strong());
        ui.label(tr(language, Text::VerificationSent));
        feedback(ui, theme, auth);

        field(
            ui,
            theme,
            tr(language, Text::VerificationKey),
            "Verification key input",
            &mut self.key,
            false,
            auth.field_error("key"),
        );

        ui.add_space(theme.spacing_sm);
        let ready = !self.key.trim().is_empty();
        if submit_button(ui, theme, tr(language, Text::VerifyEmail), "Verify email", ready) {
            action = Some(AuthAction::Verify(self.key.trim().to_string()));
        }
        ui.horizontal(|ui| {
            if ui.link(tr(language, Text::ResendEmail)).clicked() {
                action = Some(AuthAction::Resend(email.clone()));
            }
            if ui.link(tr(language, Text::Login)).clicked() {
                action = Some(AuthAction::ShowLogin);
            }
        });
        action
    }
}
