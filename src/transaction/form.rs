use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    account::{Account, AccountId},
    category::{Category, CategoryId},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction,
    },
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub transaction_type: TransactionType,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The date when the transaction ocurred.
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    pub account_id: AccountId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// The destination account of a transfer.
    #[serde(default)]
    pub related_account_id: Option<AccountId>,
}

impl TransactionForm {
    pub fn into_builder(self) -> TransactionBuilder {
        Transaction::build(self.amount, self.date, &self.description, self.account_id)
            .transaction_type(self.transaction_type)
            .category_id(self.category_id)
            .related_account_id(self.related_account_id)
    }
}

pub(super) struct TransactionFormValues<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<f64>,
    pub date: Date,
    pub description: &'a str,
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    pub related_account_id: Option<AccountId>,
    /// The latest date that can be picked, i.e. today.
    pub max_date: Date,
}

impl<'a> TransactionFormValues<'a> {
    /// A blank expense dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            transaction_type: TransactionType::Expense,
            amount: None,
            date: today,
            description: "",
            account_id: None,
            category_id: None,
            related_account_id: None,
            max_date: today,
        }
    }

    pub fn from_transaction(transaction: &'a Transaction, today: Date) -> Self {
        Self {
            transaction_type: transaction.transaction_type,
            amount: Some(transaction.amount),
            date: transaction.date,
            description: &transaction.description,
            account_id: Some(transaction.account_id),
            category_id: transaction.category_id,
            related_account_id: transaction.related_account_id,
            max_date: today.max(transaction.date),
        }
    }
}

pub(super) fn transaction_form_view(
    action: FormAction<'_>,
    values: &TransactionFormValues<'_>,
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
                legend class=(FORM_LABEL_STYLE) { "Transaction type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for transaction_type in TransactionType::ALL {
                        @let id = format!("transaction-type-{}", transaction_type.as_str());

                        div class="flex items-center gap-3"
                        {
                            input
                                name="transaction_type"
                                id=(id)
                                type="radio"
                                value=(transaction_type.as_str())
                                checked[transaction_type == values.transaction_type]
                                required
                                tabindex="0"
                                class=(FORM_RADIO_INPUT_STYLE);

                            label for=(id) class=(FORM_RADIO_LABEL_STYLE)
                            {
                                (transaction_type.label())
                            }
                        }
                    }
                }
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
                        autofocus
                        value=[amount_str.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    max=(values.max_date)
                    value=(values.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Description"
                    value=(values.description)
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

            div
            {
                label for="related_account_id" class=(FORM_LABEL_STYLE)
                {
                    "Transfer to"
                }

                select
                    name="related_account_id"
                    id="related_account_id"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[values.related_account_id.is_none()]
                    {
                        "Not a transfer"
                    }

                    @for account in accounts {
                        option
                            value=(account.id)
                            selected[values.related_account_id == Some(account.id)]
                        {
                            (account.name)
                        }
                    }
                }

                p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                {
                    "Only used for transfers. Transfers cannot have a category."
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
