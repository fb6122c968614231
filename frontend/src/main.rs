mod components;
mod hooks;
mod services;

use yew::prelude::*;
use web_sys::{KeyboardEvent, MouseEvent};
use shared::{AccountSummary, Amount, Balance, CoinBalances};

use components::balances::BalancesTable;
use components::dialog::Dialog;
use services::logging::Logger;

fn account(code: &str, name: &str, amount: &str, usd: &str) -> AccountSummary {
    AccountSummary {
        code: code.to_string(),
        name: name.to_string(),
        coin_code: "btc".to_string(),
        balance: Balance {
            available: Amount::new(amount, "BTC").with_conversion("USD", usd),
            has_incoming: false,
            incoming: None,
        },
    }
}

// Sample data until the summary is served by the wallet backend
fn sample_balances() -> CoinBalances {
    CoinBalances {
        coin_code: "btc".to_string(),
        accounts: vec![
            account("btc-0", "Savings", "0.42000000", "26460.00"),
            account("btc-1", "Spending", "0.01250000", "787.50"),
        ],
        total: Amount::new("0.43250000", "BTC").with_conversion("USD", "27247.50"),
    }
}

#[function_component(App)]
fn app() -> Html {
    let balances = use_memo((), |_| sample_balances());
    let show_dialog = use_state(|| false);

    let open_dialog = {
        let show_dialog = show_dialog.clone();
        Callback::from(move |_: MouseEvent| show_dialog.set(true))
    };

    let close_on_escape = {
        let show_dialog = show_dialog.clone();
        Callback::from(move |_: KeyboardEvent| {
            Logger::info_with_component("app", "Dialog closed with Escape");
            show_dialog.set(false);
        })
    };

    let close_dialog = {
        let show_dialog = show_dialog.clone();
        Callback::from(move |_: MouseEvent| show_dialog.set(false))
    };

    html! {
        <main class="account-summary">
            <BalancesTable
                coin_code={balances.coin_code.clone()}
                accounts={balances.accounts.clone()}
                total={balances.total.clone()}
            />
            <button class="btn btn-primary" onclick={open_dialog}>{"Receive"}</button>

            {if *show_dialog {
                html! {
                    <Dialog title="Receive bitcoin" small=true on_close={close_on_escape}>
                        <p>{"Verify the address on your device before sharing it."}</p>
                        <input type="text" readonly=true value="bc1qexampleaddress0000000000000000000000" />
                        <a href="#">{"Copy"}</a>
                        <button class="btn btn-primary" disabled=true>{"Verify"}</button>
                        <button class="btn btn-secondary" onclick={close_dialog}>{"Done"}</button>
                    </Dialog>
                }
            } else {
                html! {}
            }}
        </main>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
