//! User-facing strings. The dashboard ships in Arabic; pipeline and source
//! names stay in English as the backend and sales team use them.

use shared::{
    domain::{Source, Stage, Temperature},
    error::ValidationError,
};

use crate::controller::events::UiErrorContext;

pub const UNKNOWN_NAME: &str = "غير معروف";
pub const RETRY: &str = "إعادة المحاولة";
pub const CONFIRM_DELETE_ONE: &str = "هل أنت متأكد من حذف جهة الاتصال هذه؟";
pub const EXPORT_COMPLETE: &str = "تم تصدير جهات الاتصال";
pub const NO_CONTACTS: &str = "لا توجد جهات اتصال";
pub const LOADING: &str = "جارٍ التحميل...";
pub const CONTACT_CREATED: &str = "تم إنشاء جهة الاتصال";
pub const CONTACT_UPDATED: &str = "تم تحديث جهة الاتصال";
pub const CONTACT_DELETED: &str = "تم حذف جهة الاتصال";
pub const IMPORT_COMPLETE: &str = "تم استيراد جهات الاتصال";
pub const NOTHING_TO_UPDATE: &str = "لا توجد تغييرات للحفظ";
pub const CANCELLED: &str = "تم الإلغاء";
pub const SEARCH_LABEL: &str = "بحث";
pub const ROW_ACTIONS: &str = "عرض التفاصيل | تعديل | حذف";
pub const NEW_CONTACT: &str = "جهة اتصال جديدة";

pub fn confirm_bulk_delete(count: usize) -> String {
    format!("هل أنت متأكد من حذف {count} جهة اتصال؟")
}

pub fn failure_fallback(context: UiErrorContext) -> &'static str {
    match context {
        UiErrorContext::BackendStartup => "تعذر تشغيل عامل الخلفية",
        UiErrorContext::FetchContacts => "فشل تحميل جهات الاتصال",
        UiErrorContext::FetchStats => "فشل تحميل الإحصائيات",
        UiErrorContext::FetchContact => "فشل تحميل تفاصيل جهة الاتصال",
        UiErrorContext::Search => "فشل البحث عن جهات الاتصال",
        UiErrorContext::CreateContact => "فشل إنشاء جهة الاتصال",
        UiErrorContext::UpdateContact => "فشل تحديث جهة الاتصال",
        UiErrorContext::DeleteContact => "فشل حذف جهة الاتصال",
        UiErrorContext::BulkDelete => "فشل حذف جهات الاتصال",
        UiErrorContext::Export => "فشل تصدير جهات الاتصال",
        UiErrorContext::Import => "فشل استيراد جهات الاتصال",
        UiErrorContext::Validation => "بيانات غير صالحة",
    }
}

pub fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyName => "الاسم مطلوب".to_string(),
        ValidationError::UnknownTemperature(value) => format!("درجة حرارة غير معروفة: {value}"),
        ValidationError::UnknownStage(value) => format!("مرحلة غير معروفة: {value}"),
        ValidationError::RowsPerPage(value) => {
            format!("عدد الصفوف يجب أن يكون 25 أو 50 أو 100 (القيمة: {value})")
        }
        ValidationError::PositionalId(id) => {
            format!("جهة الاتصال {id} لا تملك معرفاً من الخادم")
        }
    }
}

pub fn temperature_label(temperature: Temperature) -> &'static str {
    match temperature {
        Temperature::Hot => "ساخن",
        Temperature::Warm => "دافئ",
        Temperature::Cold => "بارد",
        Temperature::Frozen => "متجمد",
        Temperature::Unspecified => "غير محدد",
    }
}

pub fn temperature_icon(temperature: Temperature) -> &'static str {
    match temperature {
        Temperature::Hot => "🔥",
        Temperature::Warm => "⚠️",
        Temperature::Cold => "🧊",
        Temperature::Frozen => "❄️",
        Temperature::Unspecified => "",
    }
}

pub fn stage_label(stage: &Stage) -> &str {
    match stage {
        Stage::Contact => "Contact",
        Stage::Subscriber => "Subscriber",
        Stage::Lead => "Lead",
        Stage::Mql => "MQL",
        Stage::Sql => "SQL",
        Stage::Customer => "Customer",
        Stage::Frozen => "Frozen",
        Stage::Other(raw) => raw,
    }
}

pub fn source_label(source: &Source) -> &str {
    source.as_str()
}

pub fn pagination_summary(start: u64, end: u64, total: u64) -> String {
    format!("عرض {start}-{end} من أصل {total} جهة اتصال")
}

pub fn selection_summary(selected: usize, total: u64) -> String {
    format!("تم تحديد {selected} من أصل {total} جهة اتصال")
}
