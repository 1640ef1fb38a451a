use std::collections::HashMap;
use aws_sdk_dynamodb::types::AttributeValue;
use crate::domain::{error::RefreshError, models::CatalogItem};

pub const PARTITION_KEY: &str = "PK";
pub const SORT_KEY: &str = "SK";
const ACTION: &str = "Action";
const LISTED: &str = "Listed";
const DESCRIPTION: &str = "Description";
const PRICE: &str = "Price";

pub fn to_attributes(item: &CatalogItem) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (PARTITION_KEY.to_string(), AttributeValue::S(item.item_type.clone())),
        (SORT_KEY.to_string(), AttributeValue::S(item.name.clone())),
        (ACTION.to_string(), AttributeValue::S(item.action.clone())),
        (LISTED.to_string(), AttributeValue::Bool(item.listed)),
        (DESCRIPTION.to_string(), AttributeValue::S(item.description.clone())),
        (PRICE.to_string(), AttributeValue::S(item.price.clone())),
    ])
}

pub fn from_attributes(attributes: &HashMap<String, AttributeValue>) -> Result<CatalogItem, RefreshError> {
    Ok(CatalogItem {
        item_type: string_attr(attributes, PARTITION_KEY)?,
        name: string_attr(attributes, SORT_KEY)?,
        action: string_attr(attributes, ACTION)?,
        listed: match attributes.get(LISTED) {
            Some(AttributeValue::Bool(b)) => *b,
            Some(other) => return Err(RefreshError::Marshal(format!("{} is not a boolean: {:?}", LISTED, other))),
            None => false,
        },
        description: string_attr(attributes, DESCRIPTION)?,
        price: string_attr(attributes, PRICE)?,
    })
}

fn string_attr(attributes: &HashMap<String, AttributeValue>, key: &str) -> Result<String, RefreshError> {
    let value = attributes.get(key)
        .ok_or_else(|| RefreshError::Marshal(format!("missing attribute {}", key)))?;
    value.as_s()
        .map(|s| s.to_string())
        .map_err(|other| RefreshError::Marshal(format!("{} is not a string: {:?}", key, other)))
}
