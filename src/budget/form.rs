use maud::{Markup, html};

use crate::{
    category::{Category, CategoryId},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction},
};

pub(super) fn budget_form_view(
    action: FormAction<'_>,
    category_id: Option<CategoryId>,
    amount: Option<f64>,
    categories: &[Category],
    submit_text: &str,
) -> Markup {
    let amount_str = amount.map(|amount| format!("{amount:.2}"));

    html! {
        form
            hx-post=[action.hx_post()]
            hx-put=[action.hx_put()]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category_id" id="category_id" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in categories {
                        option value=(category.id) selected[category_id == Some(category.id)]
                        {
                            (category.icon) " " (category.name)
                        }
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Monthly limit" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        placeholder="0.01"
                        min="0.01"
                        required
                        autofocus
                        value=[amount_str.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
