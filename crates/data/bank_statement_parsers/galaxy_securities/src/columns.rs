//! Sheet labels and column maps for the Galaxy Securities settlement statement.
//!
//! Raw labels are the captions printed on the statement; every map turns them into
//! the target schema names shared by all broker parsers.

use utils::{Field, Schema};

// Section and field anchors
pub const ACCOUNT_LABEL: &str = "资金帐号";
pub const PERIOD_LABEL: &str = "期间";
pub const POSITION_SECTION: &str = "证券资产";
pub const ASSET_SECTION: &str = "资产信息";
pub const DELIVERED_SECTION: &str = "资产交割";
pub const UNDELIVERED_SECTION: &str = "资产未交割";
/// Label for errors raised on the merged trade table.
pub const TRADE_RECORD_SECTION: &str = "trade_record";

pub const ALL_ANCHORS: &[&str] = &[
    ACCOUNT_LABEL,
    PERIOD_LABEL,
    ASSET_SECTION,
    POSITION_SECTION,
    DELIVERED_SECTION,
    UNDELIVERED_SECTION,
];

// Raw statement columns
pub const ACCOUNT: &str = ACCOUNT_LABEL;
pub const DATE: &str = "日期";
pub const ORDER_DATE: &str = "委托日期";
pub const MARKET: &str = "市场名称";
pub const SECURITY_CODE: &str = "证券代码";
pub const SECURITY_NAME: &str = "证券名称";
pub const BANK: &str = "银行";
pub const BUSINESS_FLAG: &str = "业务标志";

// Columns added under their final names
pub const CLIENT_ID_IN_BROKER: &str = "CLIENT_ID_IN_BROKER";
pub const CURRENCY: &str = "CURRENCY";
pub const BROKER_NAME: &str = "BROKER_NAME";
pub const CLOSE_PRICE_CURRENCY: &str = "CLOSE_PRICE_CURRENCY";
pub const FROZEN: &str = "FROZEN";
pub const INTRANSIT: &str = "INTRANSIT";
pub const FINANCING_AMOUNT: &str = "FINANCING_AMOUNT";
pub const MARGIN_AMOUNT: &str = "MARGIN_AMOUNT";
pub const A_VAL: &str = "A_VAL";
pub const H_VAL: &str = "H_VAL";
pub const KF_ABSTRACT: &str = "KF_ABSTRACT";
pub const OTHER_FEE: &str = "OTHER_FEE";

// Target names read back after renaming
pub const ASSET_ACCOUNT: &str = "ASSET_ACCOUNT";
pub const EXCHANGE: &str = "EXCHANGE";
pub const VAL: &str = "VAL";
pub const PRICE: &str = "PRICE";

/// Business flag given to unsettled trades, which carry none on the statement.
pub const UNDELIVERED_BUSINESS_FLAG: &str = "/";

/// Rows of the asset section that hold balances (one per currency line).
pub const ASSET_ROWS: usize = 3;

pub const POSITION_COLUMN_MAP: &[(&str, &str)] = &[
    (ACCOUNT, ASSET_ACCOUNT),
    (DATE, "DATA_DATE"),
    (MARKET, EXCHANGE),
    (SECURITY_CODE, "SECURITY_CODE"),
    (SECURITY_NAME, "SECURITY_NAME"),
    ("股份余额", "POSITION"),
    ("可用股份", "AVAILABLE"),
    ("参考市价", "CLOSE_PRICE"),
    ("参考成本价", "REF_COST"),
    ("参考市值", VAL),
    ("参考盈亏", "PROFIT_LOSS"),
    ("股东代码", "SHAREHOLDER_CODE"),
];

pub const ASSET_COLUMN_MAP: &[(&str, &str)] = &[
    (ACCOUNT, ASSET_ACCOUNT),
    (DATE, "DATA_DATE"),
    ("币种", CURRENCY),
    ("资金余额", "CUR_BALANCE"),
    ("可用资金", "CUR_AVAILABLE"),
    ("总资产", "TOTAL_ASSETS"),
    ("证券市值", "SECURITY_VAL"),
];

pub const TRADE_RECORD_COLUMN_MAP: &[(&str, &str)] = &[
    (DATE, "TRADE_DATE"),
    (ACCOUNT, ASSET_ACCOUNT),
    (MARKET, EXCHANGE),
    (SECURITY_CODE, "SECURITY_CODE"),
    (SECURITY_NAME, "SECURITY_NAME"),
    (BUSINESS_FLAG, "BUSINESS_FLAG"),
    ("发生数", "VOLUME"),
    ("成交价格", PRICE),
    ("发生金额", "AMOUNT"),
    ("佣金", "COMMISSION"),
    ("印花税", "STAMP_DUTY"),
    ("合同号", "CONTRACT_NO"),
    ("股东代码", "SHAREHOLDER_CODE"),
    (BANK, "BANK"),
];

/// Unsettled trades use their own captions for a few settled-trade columns.
pub const UNDELIVERED_TRADE_RENAMES: &[(&str, &str)] = &[
    (ORDER_DATE, DATE),
    ("成交数", "发生数"),
    ("成交金额", "发生金额"),
];

/// Charges folded into `OTHER_FEE`, besides commission and stamp duty.
pub const OTHER_FEE_COLUMNS: &[&str] = &["过户费", "经手费", "证管费", "交易规费", "结算费", "其他费"];

pub const POSITION_SCHEMA: Schema = Schema::new(&[
    Field::float("POSITION"),
    Field::float("AVAILABLE"),
    Field::float(VAL),
    Field::float("CLOSE_PRICE"),
    Field::float("REF_COST"),
    Field::float(FROZEN),
]);

pub const ASSET_SCHEMA: Schema = Schema::new(&[
    Field::float("CUR_BALANCE"),
    Field::float("CUR_AVAILABLE"),
    Field::float("TOTAL_ASSETS"),
    Field::float(A_VAL),
]);

pub const TRADE_RECORD_SCHEMA: Schema = Schema::new(&[
    Field::float(PRICE),
    Field::float("AMOUNT"),
    Field::float("STAMP_DUTY"),
    Field::float(OTHER_FEE),
    Field::float("COMMISSION"),
    Field::int("VOLUME"),
]);
