//! Reply formatting: action results → Telegram HTML.

use crate::domain::AccountProfile;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub const ELLIPSIS: &str = "...";

/// First `max` characters of `text`, with [`ELLIPSIS`] appended only when
/// something was cut.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str(ELLIPSIS);
    out
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_profile(p: &AccountProfile, bio_preview_len: usize) -> String {
    let bio = if p.biography.trim().is_empty() {
        "—".to_string()
    } else {
        escape_html(&preview(&p.biography, bio_preview_len))
    };

    format!(
        "📊 <b>Profil Ma'lumotlari:</b>\n\n\
         👤 <b>Username:</b> @{}\n\
         📛 <b>Ism:</b> {}\n\
         📈 <b>Followerlar:</b> {}\n\
         📉 <b>Following:</b> {}\n\
         📷 <b>Postlar:</b> {}\n\
         📝 <b>Bio:</b> {}",
        escape_html(&p.username),
        escape_html(&p.full_name),
        group_thousands(p.follower_count),
        group_thousands(p.following_count),
        group_thousands(p.post_count),
        bio,
    )
}

/// Render at most `display_cap` usernames; the rest is summarized as a count.
pub fn format_followers(followers: &[String], display_cap: usize) -> String {
    if followers.is_empty() {
        return "👥 Hozircha followerlar yo'q.".to_string();
    }

    let shown = followers.len().min(display_cap);
    let list = followers[..shown]
        .iter()
        .map(|u| format!("👤 @{}", escape_html(u)))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = format!("👥 <b>So'ngi {shown} follower:</b>\n\n{list}");
    let omitted = followers.len() - shown;
    if omitted > 0 {
        out.push_str(&format!("\n\n... va yana {omitted} ta"));
    }
    out
}

// ============== Fixed replies ==============

pub const WELCOME: &str =
    "🤖 Instagram Botiga xush kelibsiz!\nQuyidagi menyudan kerakli amalni tanlang:";
pub const UNAUTHORIZED: &str = "⛔ Ruxsat yo'q. Bu bot faqat administrator uchun.";
pub const HINT: &str = "ℹ️ Menyudan amalni tanlang yoki /start yuboring.";
pub const UNKNOWN_COMMAND: &str = "❓ Noma'lum buyruq. /start, /cancel yoki /dm dan foydalaning.";

pub const PROFILE_LOADING: &str = "⏳ Profil ma'lumotlari olinmoqda...";
pub const PROFILE_FAILED: &str = "❌ Profil ma'lumotlarini olishda xatolik!";

pub const FOLLOWERS_LOADING: &str = "⏳ Followerlar ro'yxati olinmoqda...";
pub const FOLLOWERS_FAILED: &str = "❌ Followerlarni olishda xatolik!";

pub const UPLOAD_INSTRUCTIONS: &str = "📤 Post yuklash uchun rasm va matn yuboring:\n\n\
     1. Avval rasmni yuboring\n\
     2. Keyin caption (matn) yozing\n\n\
     Yoki /cancel bilan bekor qiling.";
pub const EXPECT_PHOTO: &str = "🖼 Iltimos, avval rasm yuboring yoki /cancel bilan bekor qiling.";
pub const EXPECT_CAPTION: &str = "📝 Rasm kutmoqda. Caption (matn) yuboring yoki /cancel bilan bekor qiling.";
pub const PHOTO_RECEIVED: &str = "✅ Rasm qabul qilindi. Endi caption (matn) yuboring:";
pub const PHOTO_DOWNLOAD_FAILED: &str = "❌ Rasmni yuklab olishda xatolik! Qaytadan yuboring.";
pub const PHOTO_NOT_FOUND: &str = "❌ Rasm topilmadi!";
pub const UPLOADING: &str = "⏳ Post Instagramga yuklanmoqda...";
pub const UPLOAD_OK: &str = "✅ Post muvaffaqiyatli yuklandi!";
pub const UPLOAD_FAILED: &str = "❌ Post yuklashda xatolik!";

pub const DM_INSTRUCTIONS: &str = "📩 DM yuborish uchun:\n\n\
     Foydalanuvchi username va xabarni quyidagi formatda yuboring:\n\
     <code>username:xabar matni</code>\n\n\
     Misol: <code>john_doe:Salom! Qalaysiz?</code>";

pub const CONNECTING: &str = "⏳ Instagramga ulanmoqda...";
pub const CONNECT_OK: &str = "✅ Instagramga muvaffaqiyatli ulandi!";
pub const CONNECT_FAILED: &str = "❌ Instagramga ulanishda xatolik!";

pub const CANCELLED: &str = "🚫 Amal bekor qilindi.";

pub fn dm_sending(recipient: &str) -> String {
    format!("⏳ @{} ga xabar yuborilmoqda...", escape_html(recipient))
}

pub fn dm_sent(recipient: &str) -> String {
    format!("✅ @{} ga xabar yuborildi!", escape_html(recipient))
}

pub fn dm_failed(recipient: &str) -> String {
    format!("❌ @{} ga xabar yuborishda xatolik!", escape_html(recipient))
}

pub fn dm_format_error(reason: &str) -> String {
    format!(
        "❌ Noto'g'ri format! <code>username:xabar</code> ko'rinishida yuboring\n<i>{}</i>",
        escape_html(reason)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(bio: &str) -> AccountProfile {
        AccountProfile {
            username: "shop".to_string(),
            full_name: "Shop & Co".to_string(),
            follower_count: 1_234_567,
            following_count: 999,
            post_count: 1000,
            biography: bio.to_string(),
        }
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("user{i}")).collect()
    }

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn preview_never_exceeds_bound_plus_ellipsis() {
        assert_eq!(preview("short", 100), "short");
        let long = "ü".repeat(250);
        for max in [0, 1, 10, 100] {
            let p = preview(&long, max);
            assert!(p.chars().count() <= max + ELLIPSIS.len());
            assert!(p.ends_with(ELLIPSIS));
        }
        let exact = "a".repeat(100);
        assert_eq!(preview(&exact, 100), exact);
    }

    #[test]
    fn profile_is_escaped_and_bio_truncated() {
        let html = format_profile(&profile(&"b".repeat(300)), 100);
        assert!(html.contains("@shop"));
        assert!(html.contains("Shop &amp; Co"));
        assert!(html.contains("1,234,567"));
        assert!(html.contains(&format!("{}...", "b".repeat(100))));
        assert!(!html.contains(&"b".repeat(101)));

        let html = format_profile(&profile(""), 100);
        assert!(html.contains("<b>Bio:</b> —"));
    }

    #[test]
    fn followers_display_is_capped_with_omitted_count() {
        let html = format_followers(&names(50), 20);
        assert_eq!(html.matches("👤 @").count(), 20);
        assert!(html.ends_with("... va yana 30 ta"));
        assert!(html.contains("@user19"));
        assert!(!html.contains("@user20"));
    }

    #[test]
    fn followers_below_cap_have_no_omitted_line() {
        let html = format_followers(&names(5), 20);
        assert_eq!(html.matches("👤 @").count(), 5);
        assert!(!html.contains("va yana"));
        assert!(html.contains("So'ngi 5 follower"));
    }

    #[test]
    fn empty_followers_is_not_a_failure() {
        assert_ne!(format_followers(&[], 20), FOLLOWERS_FAILED);
    }

    #[test]
    fn dm_texts_escape_username() {
        assert_eq!(dm_sent("a<b"), "✅ @a&lt;b ga xabar yuborildi!");
        assert!(dm_format_error("missing ':' delimiter").contains("missing ':' delimiter"));
    }
}
