use maud::{Markup, html};

use crate::{
    account::AccountKind,
    bank::{Bank, BankId},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction},
};

pub(super) struct AccountFormValues<'a> {
    pub name: &'a str,
    pub kind: AccountKind,
    pub opening_balance: Option<f64>,
    pub bank_id: Option<BankId>,
}

impl Default for AccountFormValues<'_> {
    fn default() -> Self {
        Self {
            name: "",
            kind: AccountKind::Checking,
            opening_balance: None,
            bank_id: None,
        }
    }
}

pub(super) fn account_form_view(
    action: FormAction<'_>,
    values: &AccountFormValues<'_>,
    banks: &[Bank],
    submit_text: &str,
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
                label for="name" class=(FORM_LABEL_STYLE) { "Account Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Everyday"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                select id="kind" name="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for kind in AccountKind::ALL {
                        option value=(kind.as_str()) selected[kind == values.kind] { (kind.label()) }
                    }
                }
            }

            div
            {
                label for="opening_balance" class=(FORM_LABEL_STYLE) { "Opening Balance" }

                div class="input-wrapper"
                {
                    input
                        id="opening_balance"
                        type="number"
                        name="opening_balance"
                        step="0.01"
                        placeholder="0.00"
                        value=[values.opening_balance]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="bank_id" class=(FORM_LABEL_STYLE) { "Bank" }

                select id="bank_id" name="bank_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[values.bank_id.is_none()] { "No bank" }

                    @for bank in banks {
                        option value=(bank.id) selected[values.bank_id == Some(bank.id)]
                        {
                            (bank.name)
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
