//! Data kinds accepted by the import endpoints and their CSV templates

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Kind of business record that can be imported or entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Sales,
    Customers,
    Expenses,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Sales => "sales",
            DataKind::Customers => "customers",
            DataKind::Expenses => "expenses",
        }
    }

    /// Import endpoint path, e.g. `/data/upload-sales-csv`
    pub fn upload_path(&self) -> String {
        format!("/data/upload-{}-csv", self.as_str())
    }

    /// Template endpoint path, e.g. `/data/upload-template/sales`
    pub fn template_path(&self) -> String {
        format!("/data/upload-template/{}", self.as_str())
    }

    /// Default file name for a downloaded template
    pub fn template_file_name(&self) -> String {
        format!("{}_template.csv", self.as_str())
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sales" | "sale" => Ok(DataKind::Sales),
            "customers" | "customer" => Ok(DataKind::Customers),
            "expenses" | "expense" => Ok(DataKind::Expenses),
            _ => Err(DomainError::validation(format!(
                "Unknown data type: {}. Valid types: sales, customers, expenses",
                s
            ))),
        }
    }
}

/// Column layout and example row for an import file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvTemplate {
    pub columns: Vec<String>,
    #[serde(default)]
    pub example: BTreeMap<String, String>,
}

impl CsvTemplate {
    /// Renders the header row plus one example row
    ///
    /// Columns missing from `example` produce an empty cell.
    pub fn to_csv(&self) -> String {
        let header: Vec<String> = self.columns.iter().map(|c| escape_cell(c)).collect();
        let example: Vec<String> = self
            .columns
            .iter()
            .map(|c| escape_cell(self.example.get(c).map(String::as_str).unwrap_or("")))
            .collect();

        format!("{}\n{}\n", header.join(","), example.join(","))
    }
}

fn escape_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_template() -> CsvTemplate {
        serde_json::from_value(serde_json::json!({
            "columns": ["date", "product_name", "amount", "customer_id", "category"],
            "example": {
                "date": "2024-01-15",
                "product_name": "Widget A",
                "amount": "29.99",
                "customer_id": "CUST001",
                "category": "Electronics"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_paths() {
        assert_eq!(DataKind::Sales.upload_path(), "/data/upload-sales-csv");
        assert_eq!(
            DataKind::Expenses.template_path(),
            "/data/upload-template/expenses"
        );
        assert_eq!(DataKind::Customers.template_file_name(), "customers_template.csv");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Sales".parse::<DataKind>().unwrap(), DataKind::Sales);
        assert_eq!("customer".parse::<DataKind>().unwrap(), DataKind::Customers);
        assert!("invoices".parse::<DataKind>().is_err());
    }

    #[test]
    fn test_to_csv_follows_column_order() {
        let csv = sales_template().to_csv();
        assert_eq!(
            csv,
            "date,product_name,amount,customer_id,category\n2024-01-15,Widget A,29.99,CUST001,Electronics\n"
        );
    }

    #[test]
    fn test_to_csv_quotes_and_fills_missing() {
        let template = CsvTemplate {
            columns: vec!["description".into(), "amount".into(), "category".into()],
            example: BTreeMap::from([
                ("description".to_string(), "Paper, \"A4\"".to_string()),
                ("amount".to_string(), "45.50".to_string()),
            ]),
        };

        assert_eq!(
            template.to_csv(),
            "description,amount,category\n\"Paper, \"\"A4\"\"\",45.50,\n"
        );
    }
}
