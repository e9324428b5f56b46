use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The fixed set of supported currencies.
///
/// Exchange rates are a static table relative to USD (the base currency) and
/// are intentionally not fetched live.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[allow(clippy::upper_case_acronyms)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    INR,
    JPY,
    CAD,
    AUD,
    CNY,
    CHF,
    SGD,
    NZD,
    MXN,
    BRL,
    ZAR,
    HKD,
    SEK,
    NOK,
    DKK,
    AED,
    SAR,
}

/// Static currency metadata, shaped like the supported-currencies listing of
/// the payments API.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimal_places: u32,
}

impl Currency {
    pub const ALL: [Currency; 20] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::INR,
        Currency::JPY,
        Currency::CAD,
        Currency::AUD,
        Currency::CNY,
        Currency::CHF,
        Currency::SGD,
        Currency::NZD,
        Currency::MXN,
        Currency::BRL,
        Currency::ZAR,
        Currency::HKD,
        Currency::SEK,
        Currency::NOK,
        Currency::DKK,
        Currency::AED,
        Currency::SAR,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::CNY => "CNY",
            Currency::CHF => "CHF",
            Currency::SGD => "SGD",
            Currency::NZD => "NZD",
            Currency::MXN => "MXN",
            Currency::BRL => "BRL",
            Currency::ZAR => "ZAR",
            Currency::HKD => "HKD",
            Currency::SEK => "SEK",
            Currency::NOK => "NOK",
            Currency::DKK => "DKK",
            Currency::AED => "AED",
            Currency::SAR => "SAR",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Currency::USD => "US Dollar",
            Currency::EUR => "Euro",
            Currency::GBP => "British Pound",
            Currency::INR => "Indian Rupee",
            Currency::JPY => "Japanese Yen",
            Currency::CAD => "Canadian Dollar",
            Currency::AUD => "Australian Dollar",
            Currency::CNY => "Chinese Yuan",
            Currency::CHF => "Swiss Franc",
            Currency::SGD => "Singapore Dollar",
            Currency::NZD => "New Zealand Dollar",
            Currency::MXN => "Mexican Peso",
            Currency::BRL => "Brazilian Real",
            Currency::ZAR => "South African Rand",
            Currency::HKD => "Hong Kong Dollar",
            Currency::SEK => "Swedish Krona",
            Currency::NOK => "Norwegian Krone",
            Currency::DKK => "Danish Krone",
            Currency::AED => "United Arab Emirates Dirham",
            Currency::SAR => "Saudi Riyal",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::INR => "₹",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::CNY => "¥",
            Currency::CHF => "Fr",
            Currency::SGD => "S$",
            Currency::NZD => "NZ$",
            Currency::MXN => "Mex$",
            Currency::BRL => "R$",
            Currency::ZAR => "R",
            Currency::HKD => "HK$",
            Currency::SEK => "kr",
            Currency::NOK => "kr",
            Currency::DKK => "kr",
            Currency::AED => "د.إ",
            Currency::SAR => "﷼",
        }
    }

    /// Fractional-digit count for the currency. JPY does not use fractional
    /// units.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Exchange rate relative to USD.
    pub fn rate(&self) -> Decimal {
        match self {
            Currency::USD => dec!(1.0),
            Currency::EUR => dec!(0.85),
            Currency::GBP => dec!(0.73),
            Currency::INR => dec!(74.5),
            Currency::JPY => dec!(110.2),
            Currency::CAD => dec!(1.25),
            Currency::AUD => dec!(1.35),
            Currency::CNY => dec!(6.45),
            Currency::CHF => dec!(0.92),
            Currency::SGD => dec!(1.35),
            Currency::NZD => dec!(1.42),
            Currency::MXN => dec!(20.1),
            Currency::BRL => dec!(5.25),
            Currency::ZAR => dec!(14.8),
            Currency::HKD => dec!(7.78),
            Currency::SEK => dec!(8.65),
            Currency::NOK => dec!(8.75),
            Currency::DKK => dec!(6.32),
            Currency::AED => dec!(3.67),
            Currency::SAR => dec!(3.75),
        }
    }

    pub fn info(&self) -> CurrencyInfo {
        CurrencyInfo {
            code: self.code(),
            name: self.name(),
            symbol: self.symbol(),
            decimal_places: self.decimal_places(),
        }
    }

    /// Exact-match lookup by code ("USD", "JPY", ...).
    pub fn from_code(code: &str) -> Option<Currency> {
        Currency::ALL.iter().copied().find(|c| c.code() == code)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Membership test against the fixed currency table.
pub fn is_supported(code: &str) -> bool {
    Currency::from_code(code).is_some()
}

/// Converts `amount` from one currency to another through the USD base rate,
/// rounding half-up to the target currency's fractional-digit count.
pub fn convert(amount: Decimal, from: Currency, to: Currency) -> Decimal {
    let in_base = if from == Currency::USD {
        amount
    } else {
        amount / from.rate()
    };
    let converted = if to == Currency::USD {
        in_base
    } else {
        in_base * to.rate()
    };
    converted.round_dp_with_strategy(to.decimal_places(), RoundingStrategy::MidpointAwayFromZero)
}

/// Renders the amount with the currency symbol, thousands separators and the
/// currency's fixed fractional-digit count (e.g. `$1,234.50`, `¥1,235`).
pub fn format_amount(amount: Decimal, currency: Currency) -> String {
    let places = currency.decimal_places();
    let rounded =
        amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.*}", places as usize, rounded.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() {
        out.push('-');
    }
    out.push_str(currency.symbol());
    let len = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// True when the amount is positive and does not carry more fractional digits
/// than the currency allows.
pub fn valid_amount_for(amount: Decimal, currency: Currency) -> bool {
    amount > Decimal::ZERO && amount.normalize().scale() <= currency.decimal_places()
}

/// String-code variant of [`valid_amount_for`]; false for unsupported codes.
pub fn is_valid_amount_for_currency(amount: Decimal, code: &str) -> bool {
    match Currency::from_code(code) {
        Some(currency) => valid_amount_for(amount, currency),
        None => false,
    }
}
