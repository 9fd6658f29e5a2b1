//! The form shared by the create and edit category pages.

use maud::{Markup, html};

use crate::html::{
    BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction,
};

/// The values to prefill the category form with.
pub(super) struct CategoryFormValues<'a> {
    pub name: &'a str,
    pub icon: &'a str,
    pub color: &'a str,
}

pub(super) fn category_form_view(
    action: FormAction<'_>,
    values: &CategoryFormValues<'_>,
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
                label for="name" class=(FORM_LABEL_STYLE) { "Category Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="icon" class=(FORM_LABEL_STYLE) { "Icon" }

                input
                    id="icon"
                    type="text"
                    name="icon"
                    placeholder="e.g. 🛒"
                    maxlength="8"
                    value=(values.icon)
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

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
