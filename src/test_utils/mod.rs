#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use db::{get_test_connection, get_test_db_connection};
pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_input_with_value,
    assert_form_select, assert_form_submit_button, assert_form_submit_button_with_text,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{
    assert_alert_message, assert_valid_html, parse_html_document, parse_html_fragment,
    select_texts,
};
pub(crate) use http::{assert_content_type, assert_hx_redirect, assert_status_ok};
