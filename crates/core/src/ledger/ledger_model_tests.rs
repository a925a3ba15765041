use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::ledger_model::{NewAccount, NewOrder, NewTrade, OrderSide, OrderType};

fn trade_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn new_order(order_type: OrderType, limit_price: Option<rust_decimal::Decimal>) -> NewOrder {
    NewOrder {
        account_id: "acct-1".to_string(),
        instrument_id: "inst-1".to_string(),
        order_type,
        side: OrderSide::Buy,
        quantity: 10,
        limit_price,
        order_date: trade_date(),
    }
}

#[test]
fn new_account_rejects_empty_name_and_negative_cash() {
    let no_name = NewAccount {
        id: None,
        name: "  ".to_string(),
        initial_cash: dec!(1000),
    };
    assert!(no_name.validate().is_err());

    let negative = NewAccount {
        id: None,
        name: "Paper".to_string(),
        initial_cash: dec!(-0.01),
    };
    assert!(negative.validate().is_err());

    let ok = NewAccount {
        id: None,
        name: "Paper".to_string(),
        initial_cash: dec!(0),
    };
    assert!(ok.validate().is_ok());
}

#[test]
fn limit_order_requires_positive_limit_price() {
    assert!(new_order(OrderType::Limit, None).validate().is_err());
    assert!(new_order(OrderType::Limit, Some(dec!(0)))
        .validate()
        .is_err());
    assert!(new_order(OrderType::Limit, Some(dec!(-5)))
        .validate()
        .is_err());
    assert!(new_order(OrderType::Limit, Some(dec!(45.00)))
        .validate()
        .is_ok());
}

#[test]
fn market_order_must_not_carry_limit_price() {
    assert!(new_order(OrderType::Market, Some(dec!(45.00)))
        .validate()
        .is_err());
    assert!(new_order(OrderType::Market, None).validate().is_ok());
}

#[test]
fn trade_total_amount_adds_commission_on_buy_and_subtracts_on_sell() {
    let buy = NewTrade {
        order_id: "ord-1".to_string(),
        account_id: "acct-1".to_string(),
        instrument_id: "inst-1".to_string(),
        side: OrderSide::Buy,
        quantity: 100,
        price: dec!(50.03),
        commission: dec!(5.00),
        trade_date: trade_date(),
    };
    assert_eq!(buy.total_amount(), dec!(5008.00));

    let sell = NewTrade {
        side: OrderSide::Sell,
        ..buy
    };
    assert_eq!(sell.total_amount(), dec!(4998.00));
}
