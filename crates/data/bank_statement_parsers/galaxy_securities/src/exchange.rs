use std::fmt;
use utils::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    Shanghai,
    Shenzhen,
    HongKong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketSegment {
    /// Shanghai and Shenzhen, reported as `A_VAL`.
    Domestic,
    /// Hong Kong, reported as `H_VAL`.
    HongKong,
}

impl Exchange {
    /// `60` is Shanghai, `00` and `20` are Shenzhen, everything else is Hong Kong.
    pub fn from_security_code(code: &str) -> Self {
        match code.trim().get(..2) {
            Some("60") => Exchange::Shanghai,
            Some("00") | Some("20") => Exchange::Shenzhen,
            _ => Exchange::HongKong,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "SH" => Some(Exchange::Shanghai),
            "SZ" => Some(Exchange::Shenzhen),
            "HK" => Some(Exchange::HongKong),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Exchange::Shanghai => "SH",
            Exchange::Shenzhen => "SZ",
            Exchange::HongKong => "HK",
        }
    }

    pub fn segment(&self) -> MarketSegment {
        match self {
            Exchange::Shanghai | Exchange::Shenzhen => MarketSegment::Domestic,
            Exchange::HongKong => MarketSegment::HongKong,
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Exchange code for a security-code cell. A blank code has no exchange.
pub fn exchange_cell(code: &CellValue) -> CellValue {
    if code.is_null() {
        return CellValue::Null;
    }
    CellValue::text(Exchange::from_security_code(&code.to_string()).code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_by_prefix() {
        assert_eq!(Exchange::from_security_code("600001"), Exchange::Shanghai);
        assert_eq!(Exchange::from_security_code("002415"), Exchange::Shenzhen);
        assert_eq!(Exchange::from_security_code("201234"), Exchange::Shenzhen);
        assert_eq!(Exchange::from_security_code("0700"), Exchange::HongKong);
        assert_eq!(Exchange::from_security_code("300750"), Exchange::HongKong);
        assert_eq!(Exchange::from_security_code("6"), Exchange::HongKong);
    }

    #[test]
    fn test_segments() {
        assert_eq!(Exchange::Shanghai.segment(), MarketSegment::Domestic);
        assert_eq!(Exchange::Shenzhen.segment(), MarketSegment::Domestic);
        assert_eq!(Exchange::HongKong.segment(), MarketSegment::HongKong);
    }

    #[test]
    fn test_code_round_trip() {
        for e in [Exchange::Shanghai, Exchange::Shenzhen, Exchange::HongKong] {
            assert_eq!(Exchange::from_code(e.code()), Some(e));
        }
        assert_eq!(Exchange::from_code("NY"), None);
    }

    #[test]
    fn test_exchange_cell() {
        assert_eq!(exchange_cell(&CellValue::text("600519")), CellValue::text("SH"));
        assert_eq!(exchange_cell(&CellValue::Int(700)), CellValue::text("HK"));
        assert_eq!(exchange_cell(&CellValue::Null), CellValue::Null);
    }
}
