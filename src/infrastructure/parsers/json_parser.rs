use async_trait::async_trait;
use tracing::{debug, info, error};
use crate::domain::{
    error::RefreshError,
    models::{CatalogItem, Inventory},
    ports::InventoryParser,
};

pub fn parse_inventory(bytes: &[u8]) -> Result<Vec<CatalogItem>, RefreshError> {
    debug!("Parsing {} bytes of inventory JSON", bytes.len());

    let inventory: Inventory = serde_json::from_slice(bytes)
        .map_err(|e| {
            error!("Failed to parse inventory at line {}, column {}: {}", e.line(), e.column(), e);
            RefreshError::Parse(e.to_string())
        })?;

    info!("Parsed {} items from inventory", inventory.items.len());
    Ok(inventory.items)
}

#[derive(Debug, Default)]
pub struct JsonInventoryParser;

impl JsonInventoryParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InventoryParser for JsonInventoryParser {
    async fn parse(&self, bytes: &[u8]) -> Result<Vec<CatalogItem>, RefreshError> {
        parse_inventory(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_items() {
        let json = br#"{
            "Items": [
                {"name": "Earl Grey", "action": "sell", "Listed": true, "description": "Black tea", "price": "12.00"},
                {"Type": "LEGACY", "name": "Sencha", "action": "hide", "description": "Green tea", "price": "9.50"}
            ]
        }"#;

        let items = parse_inventory(json).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Earl Grey");
        assert!(items[0].listed);
        assert_eq!(items[0].item_type, "");
        assert_eq!(items[1].item_type, "LEGACY");
        assert!(!items[1].listed);
        assert_eq!(items[1].price, "9.50");
    }

    #[test]
    fn test_accepts_lowercase_items_key_and_ignores_unknown_fields() {
        let json = br#"{"items": [{"name": "Oolong", "origin": "Taiwan"}], "generated": "2024-06-01"}"#;

        let items = parse_inventory(json).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Oolong");
        assert_eq!(items[0].action, "");
    }

    #[test]
    fn test_capitalised_and_upper_case_keys() {
        let json = br#"{"Items": [
            {"Name": "Earl Grey", "Action": "sell", "Description": "Black tea", "Price": "1.00"},
            {"NAME": "Assam", "ACTION": "hide", "LISTED": true, "TYPE": "OLD", "DESCRIPTION": "Malty", "PRICE": "2.00"}
        ]}"#;

        let items = parse_inventory(json).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Earl Grey");
        assert_eq!(items[0].action, "sell");
        assert_eq!(items[0].description, "Black tea");
        assert_eq!(items[0].price, "1.00");
        assert_eq!(items[1].name, "Assam");
        assert!(items[1].listed);
        assert_eq!(items[1].item_type, "OLD");
        assert_eq!(items[1].price, "2.00");
    }

    #[test]
    fn test_empty_inventory() {
        assert!(parse_inventory(br#"{"Items": []}"#).unwrap().is_empty());
        assert!(parse_inventory(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(parse_inventory(b"{\"Items\": ["), Err(RefreshError::Parse(_))));
        assert!(matches!(parse_inventory(br#"{"Items": [{"action": "sell"}]}"#), Err(RefreshError::Parse(_))));
    }
}
