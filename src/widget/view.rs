use std::sync::Mutex;

use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    Error, endpoints,
    html::{
        BUTTON_DANGER_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        format_amount, loading_spinner,
    },
    ledger::Ledger,
    notice::{Notice, NoticeBoard},
    timezone::get_local_offset,
    transaction::FundsForm,
    widget::{
        chart::{balance_chart, balance_chart_view},
        table::transactions_table,
    },
};

/// The ID of the element HTMX replaces after each submission.
pub(super) const WIDGET_ID: &str = "widget";

/// Render the widget from the current ledger.
///
/// Pending notices are taken from `notices`, so each one is rendered once.
/// `form` pre-fills the inputs and `error` is shown below the buttons.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone,
/// - or [Error::LedgerLockError] if the ledger lock is poisoned.
pub(super) fn render_widget(
    ledger: &Mutex<Ledger>,
    notices: &NoticeBoard,
    local_timezone: &str,
    form: &FundsForm,
    error: Option<&str>,
) -> Result<Markup, Error> {
    let Some(local_offset) = get_local_offset(local_timezone) else {
        tracing::error!("Invalid timezone {}", local_timezone);
        return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
    };

    let ledger = ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    Ok(widget_view(
        &ledger,
        notices.take_all(),
        form,
        error,
        local_offset,
    ))
}

fn widget_view(
    ledger: &Ledger,
    notices: Vec<Notice>,
    form: &FundsForm,
    error: Option<&str>,
    local_offset: UtcOffset,
) -> Markup {
    let chart = balance_chart(&ledger.cumulative_series(), local_offset);

    html!(
        div
            id=(WIDGET_ID)
            class="w-full max-w-2xl mx-auto space-y-6"
        {
            @for notice in notices {
                (notice.into_markup())
            }

            section class="text-center"
            {
                h2 class="text-2xl font-bold"
                {
                    "Your total is: "
                    span id="total" { (format_amount(ledger.total())) }
                }
            }

            (funds_form(form, error))

            (transactions_table(ledger.all()))

            (balance_chart_view(&chart))
        }
    )
}

fn funds_form(form: &FundsForm, error: Option<&str>) -> Markup {
    let target = format!("#{WIDGET_ID}");

    html!(
        form
            id="funds-form"
            class="space-y-4"
            hx-target=(target)
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                input
                    id="name"
                    name="name"
                    type="text"
                    placeholder="Name of transaction"
                    value=(form.name)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    id="amount"
                    name="amount"
                    type="number"
                    step="1"
                    placeholder="Transaction amount"
                    value=(form.amount)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-4"
            {
                button
                    type="button"
                    id="add-funds"
                    hx-post=(endpoints::ADD_FUNDS_API)
                    hx-disabled-elt="#funds-form button"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="htmx-indicator" { (loading_spinner()) }
                    "Add Funds"
                }

                button
                    type="button"
                    id="subtract-funds"
                    hx-post=(endpoints::SUBTRACT_FUNDS_API)
                    hx-disabled-elt="#funds-form button"
                    class=(BUTTON_DANGER_STYLE)
                {
                    span class="htmx-indicator" { (loading_spinner()) }
                    "Subtract Funds"
                }
            }

            p id="form-error" class="error text-red-500 dark:text-red-400"
            {
                @if let Some(error) = error {
                    (error)
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use scraper::{Html, Selector};
    use time::OffsetDateTime;

    use crate::{
        Error,
        ledger::{Ledger, LedgerUpdate},
        notice::{Notice, NoticeBoard},
        test_utils::{assert_valid_html, text_of},
        transaction::{FundsForm, Transaction, TransactionName},
        widget::view::render_widget,
    };

    fn render(ledger: &Mutex<Ledger>, notices: &NoticeBoard, error: Option<&str>) -> Html {
        let markup =
            render_widget(ledger, notices, "Etc/UTC", &FundsForm::default(), error).unwrap();

        Html::parse_fragment(&markup.into_string())
    }

    #[test]
    fn renders_total_form_table_and_chart() {
        let ledger = Mutex::new(Ledger::new());
        ledger.lock().unwrap().apply(LedgerUpdate::Append(Transaction::new(
            TransactionName::new_unchecked("Paycheck"),
            500,
            OffsetDateTime::now_utc(),
        )));

        let html = render(&ledger, &NoticeBoard::default(), None);

        assert_valid_html(&html);
        assert_eq!(text_of(&html, "#total"), "$500");
        for selector in [
            "form#funds-form",
            "input[name=name]",
            "input[name=amount]",
            "button[hx-post='/api/funds/add']",
            "button[hx-post='/api/funds/subtract']",
            "table",
            "#balance-chart",
        ] {
            let parsed = Selector::parse(selector).unwrap();
            assert!(html.select(&parsed).next().is_some(), "missing {selector}");
        }
    }

    #[test]
    fn amount_input_allows_negative_magnitudes() {
        let ledger = Mutex::new(Ledger::new());

        let html = render(&ledger, &NoticeBoard::default(), None);

        let amount = Selector::parse("input[name=amount]").unwrap();
        let input = html.select(&amount).next().unwrap();
        assert_eq!(input.value().attr("min"), None);
        assert_eq!(input.value().attr("step"), Some("1"));
    }

    #[test]
    fn renders_inline_error() {
        let ledger = Mutex::new(Ledger::new());

        let html = render(&ledger, &NoticeBoard::default(), Some("Missing Information"));

        assert_eq!(text_of(&html, "#form-error"), "Missing Information");
    }

    #[test]
    fn notices_are_rendered_once() {
        let ledger = Mutex::new(Ledger::new());
        let notices = NoticeBoard::new([Notice::new(
            "Offline support is not available",
            "Transactions will only be saved once the server confirms them.",
        )]);
        let alert = Selector::parse("[role=alert]").unwrap();

        let first = render(&ledger, &notices, None);
        let second = render(&ledger, &notices, None);

        assert_eq!(first.select(&alert).count(), 1);
        assert_eq!(second.select(&alert).count(), 0);
    }

    #[test]
    fn invalid_timezone_is_an_error() {
        let ledger = Mutex::new(Ledger::new());

        let result = render_widget(
            &ledger,
            &NoticeBoard::default(),
            "Not/AZone",
            &FundsForm::default(),
            None,
        );

        assert_eq!(
            result.map(|markup| markup.into_string()),
            Err(Error::InvalidTimezoneError("Not/AZone".to_owned()))
        );
    }
}
