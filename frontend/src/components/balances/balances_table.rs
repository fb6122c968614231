use yew::prelude::*;
use shared::{AccountSummary, Amount};

use super::rates::FiatConversion;

#[derive(Properties, PartialEq)]
pub struct BalancesTableProps {
    pub coin_code: AttrValue,
    pub accounts: Vec<AccountSummary>,
    pub total: Amount,
    #[prop_or(AttrValue::Static("USD"))]
    pub fiat_unit: AttrValue,
}

#[function_component(BalancesTable)]
pub fn balances_table(props: &BalancesTableProps) -> Html {
    html! {
        <div class="balances">
            <div class="coin-header">
                <h3 class="coin-code">{props.coin_code.to_uppercase()}</h3>
            </div>
            <table class="balances-table">
                <thead>
                    <tr>
                        <th>{"Name"}</th>
                        <th>{"Balance"}</th>
                        <th>{"Fiat balance"}</th>
                    </tr>
                </thead>
                <tbody>
                    {for props.accounts.iter().map(|account| html! {
                        <BalanceRow
                            key={account.code.clone()}
                            name={account.name.clone()}
                            balance={account.available().clone()}
                            fiat_unit={props.fiat_unit.clone()}
                        />
                    })}
                </tbody>
                <tfoot>
                    <tr>
                        <th>{"Total"}</th>
                        <th>{&props.total.amount}</th>
                        <th><FiatConversion amount={props.total.clone()} fiat_unit={props.fiat_unit.clone()} /></th>
                    </tr>
                </tfoot>
            </table>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct BalanceRowProps {
    pub name: AttrValue,
    pub balance: Amount,
    pub fiat_unit: AttrValue,
}

#[function_component(BalanceRow)]
pub fn balance_row(props: &BalanceRowProps) -> Html {
    html! {
        <tr>
            <td class="name">{&props.name}</td>
            <td class="amount">{&props.balance.amount}{" "}<span class="unit">{&props.balance.unit}</span></td>
            <td class="fiat"><FiatConversion amount={props.balance.clone()} fiat_unit={props.fiat_unit.clone()} /></td>
        </tr>
    }
}
