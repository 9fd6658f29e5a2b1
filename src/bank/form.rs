use maud::{Markup, html};

use crate::html::{
    BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction,
};

pub(super) struct BankFormValues<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub logo_url: &'a str,
}

pub(super) fn bank_form_view(
    action: FormAction<'_>,
    values: &BankFormValues<'_>,
    submit_text: &str,
    error_message: &str,
) -> Markup {
    html! {
        form
            hx-post=[action.hx_post()]
            hx-put=[action.hx_put()]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Bank Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Bank Name"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="color" class=(FORM_LABEL_STYLE) { "Color" }

                input
                    id="color"
                    type="color"
                    name="color"
                    value=(values.color)
                    required
                    class="h-10 w-20 rounded";
            }

            div
            {
                label for="logo_url" class=(FORM_LABEL_STYLE) { "Logo URL (optional)" }

                input
                    id="logo_url"
                    type="url"
                    name="logo_url"
                    placeholder="https://"
                    value=(values.logo_url)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
