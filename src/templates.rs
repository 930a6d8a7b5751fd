//! Downloadable CSV templates and the reference-category file format.
//!
//! Both templates are fixed content, independent of server state. The
//! category template doubles as an offline reference set: it can be read
//! back with [`parse_categories_csv`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::models::{AccountCategory, CategoryId, TransactionType};

/// Sample transaction import file with one row per common entry kind.
pub const TRANSACTION_TEMPLATE: &str = "\
id,amount,transaction_type,description,category,transaction_date,notes,region,account_category_id
1,1000000,INCOME,Sales Revenue,Product Sales,2024-01-15,Monthly sales,Jakarta Pusat,54
2,500000,EXPENSE,Office Rent,Rent Expense,2024-01-01,Monthly office rent,Jakarta Pusat,66
3,2000000,ASSET,Cash and Cash Equivalents,Cash,2024-01-10,Initial cash deposit,Jakarta Pusat,27
";

/// Standard chart of accounts whose IDs import files may reference.
pub const CATEGORY_TEMPLATE: &str = "\
id,name,code,type,parent_id
25,Assets,1000,ASSET,
26,Current Assets,1100,ASSET,25
27,Cash and Cash Equivalents,1110,ASSET,26
28,Accounts Receivable,1120,ASSET,26
29,Inventory,1130,ASSET,26
30,Prepaid Expenses,1140,ASSET,26
31,Other Current Assets,1190,ASSET,26
32,Non-Current Assets,1200,ASSET,25
33,\"Property, Plant and Equipment\",1210,ASSET,32
34,Intangible Assets,1220,ASSET,32
35,Investments,1230,ASSET,32
36,Other Non-Current Assets,1290,ASSET,32
37,Liabilities,2000,LIABILITY,
38,Current Liabilities,2100,LIABILITY,37
39,Accounts Payable,2110,LIABILITY,38
40,Short-term Loans,2120,LIABILITY,38
41,Accrued Expenses,2130,LIABILITY,38
42,Taxes Payable,2140,LIABILITY,38
43,Other Current Liabilities,2190,LIABILITY,38
44,Non-Current Liabilities,2200,LIABILITY,37
45,Long-term Loans,2210,LIABILITY,44
46,Deferred Tax Liabilities,2220,LIABILITY,44
47,Other Non-Current Liabilities,2290,LIABILITY,44
48,Equity,3000,EQUITY,
49,Share Capital,3100,EQUITY,48
50,Retained Earnings,3200,EQUITY,48
51,Additional Paid-in Capital,3300,EQUITY,48
52,Other Comprehensive Income,3400,EQUITY,48
53,Revenue,4000,INCOME,
54,Sales Revenue,4100,INCOME,53
55,Service Revenue,4200,INCOME,53
56,Interest Income,4300,INCOME,53
57,Rental Income,4400,INCOME,53
58,Other Revenue,4900,INCOME,53
59,Expenses,5000,EXPENSE,
60,Cost of Sales,5100,EXPENSE,59
61,Direct Material Costs,5110,EXPENSE,60
62,Direct Labor Costs,5120,EXPENSE,60
63,Manufacturing Overhead,5130,EXPENSE,60
64,Operating Expenses,5200,EXPENSE,59
65,Salaries and Wages,5210,EXPENSE,64
66,Rent Expense,5220,EXPENSE,64
67,Utilities,5230,EXPENSE,64
68,Office Supplies,5240,EXPENSE,64
69,Marketing and Advertising,5250,EXPENSE,64
70,Professional Fees,5260,EXPENSE,64
71,Insurance,5270,EXPENSE,64
72,Depreciation,5280,EXPENSE,64
73,Amortization,5290,EXPENSE,64
74,Financial Expenses,5300,EXPENSE,59
75,Interest Expense,5310,EXPENSE,74
76,Bank Charges,5320,EXPENSE,74
77,Tax Expenses,5400,EXPENSE,59
78,Other Expenses,5900,EXPENSE,59
";

/// One of the downloadable templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Transaction import template.
    Transactions,
    /// Account category reference template.
    Categories,
}

impl Template {
    /// File name the template is offered under.
    #[inline]
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Transactions => "transaction_import_template.csv",
            Self::Categories => "Kategori_Akutansi.csv",
        }
    }

    /// CSV content of the template.
    #[inline]
    #[must_use]
    pub const fn contents(self) -> &'static str {
        match self {
            Self::Transactions => TRANSACTION_TEMPLATE,
            Self::Categories => CATEGORY_TEMPLATE,
        }
    }
}

/// One record of a category CSV file.
#[derive(Debug, Deserialize)]
struct CategoryRecord {
    /// Category identifier.
    id: i64,
    /// Display name.
    name: String,
    /// Ledger code.
    code: String,
    /// Booked transaction type.
    #[serde(rename = "type")]
    kind: TransactionType,
    /// Parent identifier; empty for roots.
    #[serde(default, deserialize_with = "deserialize_parent_id")]
    parent_id: Option<CategoryId>,
}

/// Reads a parent ID cell, accepting `""`, `"26"` and spreadsheet-style
/// `"26.0"`.
fn deserialize_parent_id<'de, D>(deserializer: D) -> core::result::Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| {
            text.parse::<CategoryId>().map_err(|err| {
                serde::de::Error::custom(format!("invalid parent_id {text:?}: {err}"))
            })
        })
        .transpose()
}

/// Parses account categories from CSV in the category template format.
///
/// # Errors
///
/// Returns [`ImportError::Csv`] if the header or any record is malformed.
#[inline]
pub fn parse_categories_csv<R: Read>(reader: R) -> Result<Vec<AccountCategory>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let categories = csv_reader
        .deserialize::<CategoryRecord>()
        .map(|record| {
            record.map(|rec| AccountCategory {
                id: CategoryId::new(rec.id),
                name: rec.name,
                code: rec.code,
                kind: rec.kind,
                parent_id: rec.parent_id,
            })
        })
        .collect::<core::result::Result<Vec<_>, _>>()?;
    tracing::debug!(categories = categories.len(), "parsed category file");
    Ok(categories)
}

/// Reads account categories from a CSV file on disk.
///
/// # Errors
///
/// Returns [`ImportError::Io`] if the file cannot be opened and
/// [`ImportError::Csv`] if its content is malformed.
#[inline]
pub fn read_categories_file(path: &Path) -> Result<Vec<AccountCategory>> {
    let file = File::open(path)?;
    parse_categories_csv(file)
}

/// Writes a template into `dir` under its file name and returns the
/// written path.
///
/// # Errors
///
/// Returns [`ImportError::Io`] if the file cannot be written.
#[inline]
pub fn write_template(template: Template, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(template.file_name());
    std::fs::write(&path, template.contents())?;
    Ok(path)
}
