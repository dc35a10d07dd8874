use std::fmt;
use std::str::FromStr;

use crate::import::ImportError;

/// The four tables a CSV upload can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    Orders,
    OrderDetails,
    PizzaTypes,
    Pizzas,
}

impl ImportKind {
    pub const ALL: [ImportKind; 4] = [
        ImportKind::Orders,
        ImportKind::OrderDetails,
        ImportKind::PizzaTypes,
        ImportKind::Pizzas,
    ];

    /// Lowercase route segment and metrics key
    pub fn key(self) -> &'static str {
        match self {
            ImportKind::Orders => "orders",
            ImportKind::OrderDetails => "orderdetails",
            ImportKind::PizzaTypes => "pizzatypes",
            ImportKind::Pizzas => "pizzas",
        }
    }

    /// Name used in user-facing messages, e.g. "OrderDetails file is required."
    pub fn label(self) -> &'static str {
        match self {
            ImportKind::Orders => "Orders",
            ImportKind::OrderDetails => "OrderDetails",
            ImportKind::PizzaTypes => "PizzaTypes",
            ImportKind::Pizzas => "Pizzas",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            ImportKind::Orders => "orders",
            ImportKind::OrderDetails => "order details",
            ImportKind::PizzaTypes => "pizza types",
            ImportKind::Pizzas => "pizzas",
        }
    }

    pub fn success_message(self) -> String {
        format!("{} imported successfully.", self.label())
    }

    pub fn failure_message(self) -> String {
        format!("Failed to import {}.", self.noun())
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ImportKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_lowercase();
        ImportKind::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| ImportError::UnknownKind(s.to_string()))
    }
}
