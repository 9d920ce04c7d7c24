use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    let selector = Selector::parse("form").expect("Invalid form selector");

    html.select(&selector).next().expect("No form found")
}

/// Check that `form` sends its request to `endpoint` with the htmx `attribute`,
/// e.g. `hx-post` or `hx-put`.
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    assert_eq!(
        form.value().attr(attribute),
        Some(endpoint),
        "want form with {attribute}=\"{endpoint}\""
    );
}

#[track_caller]
fn must_get_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    let selector =
        Selector::parse(&format!("input[name=\"{name}\"]")).expect("Invalid input selector");

    form.select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""))
}

/// Check that a required input `name` of type `type_` exists in `form`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_input(form, name);

    assert_eq!(
        input.value().attr("type"),
        Some(type_),
        "want input {name} with type \"{type_}\""
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input {name} to be required"
    );
}

/// Like [assert_form_input], and also check the prefilled value.
#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    assert_form_input(form, name, type_);

    let input = must_get_input(form, name);
    assert_eq!(
        input.value().attr("value").unwrap_or_default(),
        value,
        "want input {name} with value \"{value}\""
    );
}

#[track_caller]
fn must_get_submit_button<'a>(form: &ElementRef<'a>) -> ElementRef<'a> {
    let selector = Selector::parse("button[type=submit]").expect("Invalid button selector");

    form.select(&selector)
        .next()
        .expect("No submit button found")
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    must_get_submit_button(form);
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let button = must_get_submit_button(form);
    let got_text = button.text().collect::<String>();

    assert_eq!(got_text.trim(), text);
}
