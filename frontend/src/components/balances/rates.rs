use yew::prelude::*;
use shared::Amount;

/// Placeholder shown when the backend sent no conversion for the unit
pub const MISSING_CONVERSION: &str = "---";

#[derive(Properties, PartialEq)]
pub struct FiatConversionProps {
    pub amount: Amount,
    pub fiat_unit: AttrValue,
}

#[function_component(FiatConversion)]
pub fn fiat_conversion(props: &FiatConversionProps) -> Html {
    html! {
        <span class="fiat-conversion">
            {fiat_text(&props.amount, &props.fiat_unit)}
        </span>
    }
}

pub fn fiat_text(amount: &Amount, fiat_unit: &str) -> String {
    match amount.conversion(fiat_unit) {
        Some(value) => format!("{} {}", value, fiat_unit),
        None => MISSING_CONVERSION.to_string(),
    }
}
