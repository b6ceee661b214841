use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic value type selecting which generator produces a field's values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum TypeId {
    Uuid,
    Number,
    String,
    Boolean,
    ChineseName,
    EnglishName,
    Email,
    ChinesePhone,
    Phone,
    ChineseIdCard,
    Age,
    Gender,
    ChineseAddress,
    Province,
    City,
    Zipcode,
    Date,
    Datetime,
    Timestamp,
    BankCard,
    Amount,
    Url,
    Ip,
    Ipv6,
    Mac,
    Domain,
    Company,
    JobTitle,
    Paragraph,
    Sentence,
    Word,
}

/// UI grouping for value types. The engine does not depend on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Identifier,
    Personal,
    Address,
    Datetime,
    Finance,
    Internet,
    Company,
    Text,
}

/// Catalog entry describing a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    pub id: TypeId,
    /// Display label shown by the dashboard.
    pub name: &'static str,
    pub category: Category,
}

/// Error returned when a string does not name a known value type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type '{0}'")]
pub struct ParseTypeIdError(pub String);

impl TypeId {
    /// Every value type, in catalog order.
    pub const ALL: [TypeId; 31] = [
        TypeId::Uuid,
        TypeId::Number,
        TypeId::String,
        TypeId::Boolean,
        TypeId::ChineseName,
        TypeId::EnglishName,
        TypeId::Email,
        TypeId::ChinesePhone,
        TypeId::Phone,
        TypeId::ChineseIdCard,
        TypeId::Age,
        TypeId::Gender,
        TypeId::ChineseAddress,
        TypeId::Province,
        TypeId::City,
        TypeId::Zipcode,
        TypeId::Date,
        TypeId::Datetime,
        TypeId::Timestamp,
        TypeId::BankCard,
        TypeId::Amount,
        TypeId::Url,
        TypeId::Ip,
        TypeId::Ipv6,
        TypeId::Mac,
        TypeId::Domain,
        TypeId::Company,
        TypeId::JobTitle,
        TypeId::Paragraph,
        TypeId::Sentence,
        TypeId::Word,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeId::Uuid => "uuid",
            TypeId::Number => "number",
            TypeId::String => "string",
            TypeId::Boolean => "boolean",
            TypeId::ChineseName => "chineseName",
            TypeId::EnglishName => "englishName",
            TypeId::Email => "email",
            TypeId::ChinesePhone => "chinesePhone",
            TypeId::Phone => "phone",
            TypeId::ChineseIdCard => "chineseIdCard",
            TypeId::Age => "age",
            TypeId::Gender => "gender",
            TypeId::ChineseAddress => "chineseAddress",
            TypeId::Province => "province",
            TypeId::City => "city",
            TypeId::Zipcode => "zipcode",
            TypeId::Date => "date",
            TypeId::Datetime => "datetime",
            TypeId::Timestamp => "timestamp",
            TypeId::BankCard => "bankCard",
            TypeId::Amount => "amount",
            TypeId::Url => "url",
            TypeId::Ip => "ip",
            TypeId::Ipv6 => "ipv6",
            TypeId::Mac => "mac",
            TypeId::Domain => "domain",
            TypeId::Company => "company",
            TypeId::JobTitle => "jobTitle",
            TypeId::Paragraph => "paragraph",
            TypeId::Sentence => "sentence",
            TypeId::Word => "word",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            TypeId::Uuid | TypeId::Number | TypeId::String | TypeId::Boolean => {
                Category::Identifier
            }
            TypeId::ChineseName
            | TypeId::EnglishName
            | TypeId::Email
            | TypeId::ChinesePhone
            | TypeId::Phone
            | TypeId::ChineseIdCard
            | TypeId::Age
            | TypeId::Gender => Category::Personal,
            TypeId::ChineseAddress | TypeId::Province | TypeId::City | TypeId::Zipcode => {
                Category::Address
            }
            TypeId::Date | TypeId::Datetime | TypeId::Timestamp => Category::Datetime,
            TypeId::BankCard | TypeId::Amount => Category::Finance,
            TypeId::Url | TypeId::Ip | TypeId::Ipv6 | TypeId::Mac | TypeId::Domain => {
                Category::Internet
            }
            TypeId::Company | TypeId::JobTitle => Category::Company,
            TypeId::Paragraph | TypeId::Sentence | TypeId::Word => Category::Text,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TypeId::Uuid => "UUID",
            TypeId::Number => "数字",
            TypeId::String => "随机字符串",
            TypeId::Boolean => "布尔值",
            TypeId::ChineseName => "中文姓名",
            TypeId::EnglishName => "英文姓名",
            TypeId::Email => "邮箱",
            TypeId::ChinesePhone => "中国手机号",
            TypeId::Phone => "国际手机号",
            TypeId::ChineseIdCard => "身份证号",
            TypeId::Age => "年龄",
            TypeId::Gender => "性别",
            TypeId::ChineseAddress => "中国地址",
            TypeId::Province => "省份",
            TypeId::City => "城市",
            TypeId::Zipcode => "邮编",
            TypeId::Date => "日期",
            TypeId::Datetime => "日期时间",
            TypeId::Timestamp => "时间戳",
            TypeId::BankCard => "银行卡号",
            TypeId::Amount => "金额",
            TypeId::Url => "URL",
            TypeId::Ip => "IPv4",
            TypeId::Ipv6 => "IPv6",
            TypeId::Mac => "MAC地址",
            TypeId::Domain => "域名",
            TypeId::Company => "公司名称",
            TypeId::JobTitle => "职位",
            TypeId::Paragraph => "段落",
            TypeId::Sentence => "句子",
            TypeId::Word => "词语",
        }
    }

    pub fn info(&self) -> TypeInfo {
        TypeInfo {
            id: *self,
            name: self.display_name(),
            category: self.category(),
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeId {
    type Err = ParseTypeIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TypeId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| ParseTypeIdError(value.to_string()))
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Identifier => "identifier",
            Category::Personal => "personal",
            Category::Address => "address",
            Category::Datetime => "datetime",
            Category::Finance => "finance",
            Category::Internet => "internet",
            Category::Company => "company",
            Category::Text => "text",
        }
    }

    /// Catalog entries belonging to this category.
    pub fn types(&self) -> Vec<TypeInfo> {
        catalog()
            .into_iter()
            .filter(|info| info.category == *self)
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        categories()
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| format!("unknown category '{value}'"))
    }
}

/// Full type catalog in display order.
pub fn catalog() -> Vec<TypeInfo> {
    TypeId::ALL.iter().map(TypeId::info).collect()
}

/// Distinct categories in the order they first appear in the catalog.
pub fn categories() -> Vec<Category> {
    let mut seen = Vec::new();
    for id in TypeId::ALL {
        let category = id.category();
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for id in TypeId::ALL {
            assert_eq!(id.as_str().parse::<TypeId>(), Ok(id));
        }
        assert_eq!(
            "bogus".parse::<TypeId>(),
            Err(ParseTypeIdError("bogus".to_string()))
        );
    }

    #[test]
    fn serde_ids_match_as_str() {
        for id in TypeId::ALL {
            let json = serde_json::to_value(id).expect("serialize type id");
            assert_eq!(json, serde_json::Value::String(id.as_str().to_string()));
        }
    }

    #[test]
    fn categories_cover_catalog() {
        let categories = categories();
        assert_eq!(categories.len(), 8);
        assert_eq!(categories[0], Category::Identifier);
        let total: usize = categories.iter().map(|c| c.types().len()).sum();
        assert_eq!(total, TypeId::ALL.len());
        assert_eq!(Category::Finance.types().len(), 2);
    }
}
