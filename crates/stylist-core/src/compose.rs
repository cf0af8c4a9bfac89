//! Reply text for a recommendation set.
//!
//! Pure formatting: no I/O, no persistence.
//!
//! ```text
//! Dựa trên thông tin bạn cung cấp, tôi gợi ý những mẫu kính sau:
//!
//! - Rayban Round: 300.000đ
//!   SKU: rayban_round_cuivre_pinkBrownDegrade
//!   Mô tả: Kính mắt Rayban Round màu đồng
//!
//! Và 1 sản phẩm khác. Bạn có muốn xem thêm không?
//!
//! Bạn có muốn biết thêm thông tin về mẫu kính nào không?
//! ```

use std::fmt::Write;

use crate::models::Product;

pub const FALLBACK_MESSAGE: &str = "Xin lỗi, tôi không tìm thấy kính phù hợp với yêu cầu của bạn. \
Bạn có thể mô tả chi tiết hơn về phong cách hoặc nhu cầu của mình không?";

pub const PREAMBLE: &str = "Dựa trên thông tin bạn cung cấp, tôi gợi ý những mẫu kính sau:";

pub const CLOSING: &str = "Bạn có muốn biết thêm thông tin về mẫu kính nào không?";

/// Product blocks rendered before the "more" line.
pub const SHOWN_PRODUCTS: usize = 3;

/// Render `recommendations` as reply text.
pub fn compose(recommendations: &[Product]) -> String {
    compose_counted(recommendations, recommendations.len())
}

/// Render `recommendations`, counting the "more" line against
/// `total_matches` rather than the truncated list.
pub fn compose_counted(recommendations: &[Product], total_matches: usize) -> String {
    if recommendations.is_empty() {
        return FALLBACK_MESSAGE.to_string();
    }

    let mut out = String::new();
    out.push_str(PREAMBLE);
    out.push_str("\n\n");

    for product in recommendations.iter().take(SHOWN_PRODUCTS) {
        let _ = writeln!(out, "- {}: {}", product.name, format_price(product.price));
        let _ = writeln!(out, "  SKU: {}", product.sku);
        if let Some(desc) = product.description.as_deref().filter(|d| !d.trim().is_empty()) {
            let _ = writeln!(out, "  Mô tả: {}", desc);
        }
        out.push('\n');
    }

    let total = total_matches.max(recommendations.len());
    if total > SHOWN_PRODUCTS {
        let _ = writeln!(
            out,
            "Và {} sản phẩm khác. Bạn có muốn xem thêm không?\n",
            total - SHOWN_PRODUCTS
        );
    }

    out.push_str(CLOSING);
    out
}

/// Format whole đồng with `.` thousands grouping, e.g. `1.250.000đ`.
pub fn format_price(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{}đ", grouped)
    } else {
        format!("{}đ", grouped)
    }
}
