use maud::{Markup, html};
use time::Date;

use crate::{
    account::{Account, AccountId},
    category::{Category, CategoryId},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction,
    },
    recurring::{Frequency, RecurringTransaction, RecurringType},
};

pub(super) struct RecurringFormValues<'a> {
    pub description: &'a str,
    pub amount: Option<f64>,
    pub recurring_type: RecurringType,
    pub frequency: Frequency,
    pub start_date: Date,
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
}

impl<'a> RecurringFormValues<'a> {
    /// A blank monthly expense starting `today`.
    pub fn new(today: Date) -> Self {
        Self {
            description: "",
            amount: None,
            recurring_type: RecurringType::Expense,
            frequency: Frequency::Monthly,
            start_date: today,
            account_id: None,
            category_id: None,
        }
    }

    pub fn from_recurring(recurring: &'a RecurringTransaction) -> Self {
        Self {
            description: &recurring.description,
            amount: Some(recurring.amount),
            recurring_type: recurring.recurring_type,
            frequency: recurring.frequency,
            start_date: recurring.start_date,
            account_id: Some(recurring.account_id),
            category_id: recurring.category_id,
        }
    }
}

pub(super) fn recurring_form_view(
    action: FormAction<'_>,
    values: &RecurringFormValues<'_>,
    accounts: &[Account],
    categories: &[Category],
    submit_text: &str,
) -> Markup {
    let amount_str = values.amount.map(|amount| format!("{amount:.2}"));

    html! {
        form
            hx-post=[action.hx_post()]
            hx-put=[action.hx_put()]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for recurring_type in RecurringType::ALL {
                        @let id = format!("recurring-type-{}", recurring_type.as_str());

                        div class="flex items-center gap-3"
                        {
                            input
                                name="recurring_type"
                                id=(id)
                                type="radio"
                                value=(recurring_type.as_str())
                                checked[*recurring_type == values.recurring_type]
                                required
                                class=(FORM_RADIO_INPUT_STYLE);

                            label for=(id) class=(FORM_RADIO_LABEL_STYLE)
                            {
                                (recurring_type.label())
                            }
                        }
                    }
                }
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Streaming service"
                    required
                    autofocus
                    value=(values.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

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
                        value=[amount_str.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="frequency" class=(FORM_LABEL_STYLE) { "Frequency" }

                select name="frequency" id="frequency" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for frequency in Frequency::ALL {
                        option
                            value=(frequency.as_str())
                            selected[*frequency == values.frequency]
                        {
                            (frequency.label())
                        }
                    }
                }
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "Start date" }

                input
                    name="start_date"
                    id="start_date"
                    type="date"
                    value=(values.start_date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }

                select name="account_id" id="account_id" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for account in accounts {
                        option
                            value=(account.id)
                            selected[values.account_id == Some(account.id)]
                        {
                            (account.name)
                        }
                    }
                }
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[values.category_id.is_none()] { "No category" }

                    @for category in categories {
                        option
                            value=(category.id)
                            selected[values.category_id == Some(category.id)]
                        {
                            (category.icon) " " (category.name)
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
