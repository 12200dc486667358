use serde::Serialize;

/// A named set of search keywords shown together on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

impl KeywordGroup {
    pub fn keywords(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.to_string()).collect()
    }
}

pub const CORE_SALES: KeywordGroup = KeywordGroup {
    id: "core",
    label: "핵심 영업",
    keywords: &["호텔 리모델링", "건자재 가격", "건설업 전망"],
};

pub const ORDER_OPPORTUNITY: KeywordGroup = KeywordGroup {
    id: "orders",
    label: "수주 기회",
    keywords: &["신규 리조트 분양", "재건축 인테리어", "오피스 리모델링"],
};

pub const INDUSTRY_TREND: KeywordGroup = KeywordGroup {
    id: "industry",
    label: "업계 동향",
    keywords: &["한샘 B2B", "LX하우시스", "현대리바트"],
};

pub fn default_groups() -> Vec<KeywordGroup> {
    vec![CORE_SALES, ORDER_OPPORTUNITY, INDUSTRY_TREND]
}

pub fn find_group(id: &str) -> Option<KeywordGroup> {
    default_groups().into_iter().find(|g| g.id == id)
}

/// Every preset keyword, group by group.
pub fn all_keywords() -> Vec<String> {
    default_groups().iter().flat_map(|g| g.keywords()).collect()
}
