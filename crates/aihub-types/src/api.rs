//! Wire types of the envelope-style backend endpoints.

use serde::{Deserialize, Serialize};

use crate::{ChatError, Result};

/// Code the backend uses for success in every envelope
pub const SUCCESS_CODE: &str = "0000";

/// `{code, info, data}` wrapper around every non-streaming response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: String,
    #[serde(default)]
    pub info: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Success with a payload. A success envelope without data is malformed.
    pub fn into_data(self) -> Result<T> {
        if !self.is_success() {
            return Err(ChatError::Envelope { code: self.code, info: self.info });
        }
        self.data
            .ok_or_else(|| ChatError::Serialization("envelope has no data".to_string()))
    }

    /// Success where the payload is irrelevant (usually null)
    pub fn check(self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ChatError::Envelope { code: self.code, info: self.info })
        }
    }
}

// ─── Roles ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleItem {
    pub mmu: RoleMmu,
    pub prompt: RolePrompt,
}

/// Persona identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMmu {
    pub id: i64,
    pub role_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar: String,
}

/// System prompt attached to a persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePrompt {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub like: i64,
    #[serde(rename = "isLike", default)]
    pub is_like: bool,
    #[serde(default)]
    pub prompt_id: Option<i64>,
}

// ─── User / catalog / orders ─────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub quota: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub pic: Option<String>,
    #[serde(default)]
    pub product_desc: String,
    pub quota: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub product_name: String,
    #[serde(default)]
    pub product_quota: i64,
    pub order_id: String,
    #[serde(default)]
    pub order_time: Option<String>,
    pub pay_status: String,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub pay_type: Option<String>,
    #[serde(default)]
    pub pay_time: Option<String>,
    /// Payment form HTML for orders still awaiting payment
    #[serde(default)]
    pub pay_url: Option<String>,
}

/// Display classification of `Order::pay_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayState {
    Paid,
    Pending,
    Failed,
    Other,
}

impl Order {
    pub fn pay_state(&self) -> PayState {
        match self.pay_status.as_str() {
            "完成" | "支付成功" | "支付完成" => PayState::Paid,
            "等待支付" => PayState::Pending,
            "已关闭" | "支付失败" => PayState::Failed,
            _ => PayState::Other,
        }
    }

    pub fn can_pay(&self) -> bool {
        self.pay_state() == PayState::Pending
            && self.pay_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}
