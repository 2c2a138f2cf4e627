//! C FFI bindings for GlucoGrade - for game engine and native host integration
//!
//! Build: cargo build --release -p glucograde-ffi
//! This generates a cdylib/staticlib that can be loaded from C, C# or Swift

use std::ffi::{c_char, CStr, CString};
use std::io::Write;
use std::ptr;

use glucograde_core::{
    assess, normalize, runtime as core_runtime, measurement_from_utterance, Assessment, Config,
    DiabetesType, NutrientVector, Pipeline,
};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::runtime::Runtime;

// =============================================================================
// Global Singleton Tokio Runtime
// =============================================================================

/// Runtime shared across all FFI calls. `None` if it could not be built, in
/// which case core falls back to a temporary runtime per call.
static RUNTIME: Lazy<Option<Arc<Runtime>>> = Lazy::new(|| {
    log_debug("Creating global Tokio runtime");
    match Runtime::new() {
        Ok(rt) => {
            let rt = Arc::new(rt);
            core_runtime::register_runtime(Arc::clone(&rt));
            log_debug("Runtime registered with glucograde-core");
            Some(rt)
        }
        Err(e) => {
            log_debug(&format!("Failed to create Tokio runtime: {}", e));
            None
        }
    }
});

/// Force initialization of the global runtime (call early in host lifecycle)
pub fn ensure_runtime_initialized() {
    let _ = &*RUNTIME;
}

/// Write debug log to file (game engines rarely surface stderr)
fn log_debug(msg: &str) {
    if let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::env::temp_dir().join("glucograde_debug.log"))
    {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(file, "[{}] {}", timestamp, msg);
    }
}

fn panic_message(e: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = e.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = e.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn into_c_string(s: &str) -> *mut c_char {
    CString::new(s)
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Borrow a C string; `None` for null or invalid UTF-8
unsafe fn borrow_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        None
    } else {
        CStr::from_ptr(s).to_str().ok()
    }
}

/// Opaque handle to the GlucoGrade pipeline
pub struct GlucoGradeHandle {
    /// Owns the nutrition table and the session reading
    pipeline: Pipeline,
}

/// Scoring outcome returned to foreign callers
#[repr(C)]
pub struct GlucoGradeScore {
    pub success: bool,
    pub score: f64,
    /// Grade label ("A+" .. "F", "Invalid") or advice message
    pub label: *mut c_char,
    /// "#RRGGBB"
    pub color: *mut c_char,
    /// Icon index, -1 to keep the current icon
    pub icon: i32,
    pub error_message: *mut c_char,
}

impl GlucoGradeScore {
    fn from_assessment(assessment: &Assessment) -> Self {
        let presentation = assessment.verdict.presentation();
        Self {
            success: true,
            score: assessment.score,
            label: into_c_string(assessment.verdict.label()),
            color: into_c_string(presentation.color.hex()),
            icon: presentation.icon.map_or(-1, i32::from),
            error_message: ptr::null_mut(),
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            success: false,
            score: 0.0,
            label: ptr::null_mut(),
            color: ptr::null_mut(),
            icon: -1,
            error_message: into_c_string(msg),
        }
    }

    unsafe fn free(self) {
        for s in [self.label, self.color, self.error_message] {
            if !s.is_null() {
                let _ = CString::from_raw(s);
            }
        }
    }
}

/// Result of processing one utterance
#[repr(C)]
pub struct GlucoGradeResult {
    /// Score and presentation; `score.success` is false on failure
    pub score: GlucoGradeScore,
    /// Whether this utterance contained a reading
    pub has_measurement: bool,
    pub measurement: f64,
    /// Reading the food was scored against
    pub reference: f64,
    pub food_id: u32,
    pub food_name: *mut c_char,
    pub extraction_us: u64,
    pub total_us: u64,
}

fn error_result(msg: &str) -> GlucoGradeResult {
    GlucoGradeResult {
        score: GlucoGradeScore::error(msg),
        has_measurement: false,
        measurement: 0.0,
        reference: 0.0,
        food_id: 0,
        food_name: ptr::null_mut(),
        extraction_us: 0,
        total_us: 0,
    }
}

/// # Safety
/// config_path must be a valid null-terminated string or null for default
#[no_mangle]
pub unsafe extern "C" fn glucograde_init(config_path: *const c_char) -> *mut GlucoGradeHandle {
    log_debug("glucograde_init called");

    ensure_runtime_initialized();

    // Wrap everything in catch_unwind to prevent panics from unwinding across FFI boundary
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let config_str = if config_path.is_null() {
            None
        } else {
            match CStr::from_ptr(config_path).to_str() {
                Ok(s) => Some(s),
                Err(_) => return ptr::null_mut(),
            }
        };

        let config = match Config::load(config_str) {
            Ok(c) => {
                log_debug(&format!(
                    "Config loaded: baseline={} type={}",
                    c.baseline_glucose,
                    c.diabetes_type.display_name()
                ));
                c
            }
            Err(e) => {
                log_debug(&format!("Failed to load config: {}", e));
                return ptr::null_mut();
            }
        };

        let pipeline = match core_runtime::block_on(Pipeline::from_config(&config)) {
            Ok(Ok(p)) => p,
            Ok(Err(e)) | Err(e) => {
                log_debug(&format!("Failed to create pipeline: {:#}", e));
                return ptr::null_mut();
            }
        };

        log_debug(&format!(
            "glucograde_init complete - {} foods loaded",
            pipeline.table().len()
        ));
        Box::into_raw(Box::new(GlucoGradeHandle { pipeline }))
    }));

    match result {
        Ok(ptr) => ptr,
        Err(e) => {
            log_debug(&format!("PANIC caught in glucograde_init: {}", panic_message(&*e)));
            ptr::null_mut()
        }
    }
}

/// Cleanup and free the handle
///
/// # Safety
/// Only call this once per handle
#[no_mangle]
pub unsafe extern "C" fn glucograde_destroy(handle: *mut GlucoGradeHandle) {
    if !handle.is_null() {
        let _ = Box::from_raw(handle);
    }
}

/// Rewrite spelled-out numbers as digits. Free with `glucograde_free_string`
///
/// # Safety
/// text must be a valid null-terminated string or null
#[no_mangle]
pub unsafe extern "C" fn glucograde_normalize(text: *const c_char) -> *mut c_char {
    let result = std::panic::catch_unwind(|| match borrow_str(text) {
        Some(text) => into_c_string(&normalize(text)),
        None => ptr::null_mut(),
    });

    result.unwrap_or_else(|e| {
        log_debug(&format!("PANIC caught in glucograde_normalize: {}", panic_message(&*e)));
        ptr::null_mut()
    })
}

/// Extract the glucose reading from a sentence into `out`.
/// Returns false (leaving `out` untouched) when no number is found
///
/// # Safety
/// text must be a valid null-terminated string or null; out must be valid for writes
#[no_mangle]
pub unsafe extern "C" fn glucograde_measurement(text: *const c_char, out: *mut f64) -> bool {
    if out.is_null() {
        return false;
    }

    let result = std::panic::catch_unwind(|| measurement_from_utterance(borrow_str(text)));

    match result {
        Ok(Some(reading)) => {
            *out = reading;
            true
        }
        Ok(None) => {
            log_debug("No number found in utterance, please repeat");
            false
        }
        Err(e) => {
            log_debug(&format!("PANIC caught in glucograde_measurement: {}", panic_message(&*e)));
            false
        }
    }
}

/// Score a nutrient vector against a reading.
/// `values` holds 7 or 8 numbers: id, carbohydrate, fat, fiber, protein,
/// sugar, added sugar and optionally serving weight.
/// Free with `glucograde_free_score`
///
/// # Safety
/// values must point to len doubles
#[no_mangle]
pub unsafe extern "C" fn glucograde_score(
    values: *const f64,
    len: usize,
    reference: f64,
    type_one: bool,
) -> GlucoGradeScore {
    if values.is_null() {
        return GlucoGradeScore::error("Invalid nutrient data");
    }

    let diabetes_type = if type_one {
        DiabetesType::TypeOne
    } else {
        DiabetesType::TypeTwo
    };

    let result = std::panic::catch_unwind(|| {
        let values = std::slice::from_raw_parts(values, len);
        let nutrients = match NutrientVector::from_slice(values) {
            Ok(n) => n,
            Err(e) => return GlucoGradeScore::error(&e.to_string()),
        };
        match assess(&nutrients, reference, diabetes_type) {
            Ok(assessment) => GlucoGradeScore::from_assessment(&assessment),
            Err(e) => {
                log_debug(&format!("Scoring failed: {}", e));
                GlucoGradeScore::error(&e.to_string())
            }
        }
    });

    result.unwrap_or_else(|e| {
        let msg = panic_message(&*e);
        log_debug(&format!("PANIC caught in glucograde_score: {}", msg));
        GlucoGradeScore::error(&format!("Internal error: {}", msg))
    })
}

/// Extract the reading and food from an utterance and grade the food.
/// Free with `glucograde_free_result`
///
/// # Safety
/// - handle must be a valid pointer from glucograde_init
/// - text must be a valid null-terminated string
#[no_mangle]
pub unsafe extern "C" fn glucograde_process(
    handle: *mut GlucoGradeHandle,
    text: *const c_char,
) -> GlucoGradeResult {
    if handle.is_null() || text.is_null() {
        log_debug("ERROR - Invalid handle or text");
        return error_result("Invalid handle or text");
    }

    let handle_ptr = handle;

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let handle = &mut *handle_ptr;
        let text = match borrow_str(text) {
            Some(t) => t,
            None => return error_result("Text is not valid UTF-8"),
        };
        log_debug(&format!("glucograde_process: '{}'", text));

        match core_runtime::block_on(handle.pipeline.process(text)) {
            Ok(Ok(result)) => {
                log_debug(&format!(
                    "Success! {} at {} → {}",
                    result.food.name,
                    result.reference,
                    result.assessment.verdict.label()
                ));
                GlucoGradeResult {
                    score: GlucoGradeScore::from_assessment(&result.assessment),
                    has_measurement: result.measurement.is_some(),
                    measurement: result.measurement.unwrap_or(0.0),
                    reference: result.reference,
                    food_id: result.food.food_id,
                    food_name: into_c_string(&result.food.name),
                    extraction_us: result.timings.extraction_us,
                    total_us: result.timings.total_us,
                }
            }
            Ok(Err(e)) => {
                log_debug(&format!("ERROR - pipeline.process failed: {}", e));
                let mut result = error_result(&e.to_string());
                result.reference = handle.pipeline.session().reference();
                result
            }
            Err(e) => {
                log_debug(&format!("ERROR - runtime unavailable: {:#}", e));
                error_result(&e.to_string())
            }
        }
    }));

    result.unwrap_or_else(|e| {
        let msg = panic_message(&*e);
        log_debug(&format!("PANIC caught in glucograde_process: {}", msg));
        error_result(&format!("Internal error: {}", msg))
    })
}

/// Free a GlucoGradeScore's strings
///
/// # Safety
/// Only call this once per score
#[no_mangle]
pub unsafe extern "C" fn glucograde_free_score(score: GlucoGradeScore) {
    score.free();
}

/// Free a GlucoGradeResult's strings
///
/// # Safety
/// Only call this once per result
#[no_mangle]
pub unsafe extern "C" fn glucograde_free_result(result: GlucoGradeResult) {
    result.score.free();
    if !result.food_name.is_null() {
        let _ = CString::from_raw(result.food_name);
    }
}

/// Free a C string returned by other functions
///
/// # Safety
/// Only call once per string
#[no_mangle]
pub unsafe extern "C" fn glucograde_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Get the library version
#[no_mangle]
pub extern "C" fn glucograde_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    unsafe fn take(s: *mut c_char) -> String {
        assert!(!s.is_null());
        let owned = CStr::from_ptr(s).to_string_lossy().into_owned();
        glucograde_free_string(s);
        owned
    }

    fn missing_config() -> CString {
        let path = std::env::temp_dir().join(format!("glucograde-ffi-{}.toml", std::process::id()));
        c(path.to_str().unwrap())
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(glucograde_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_normalize() {
        let text = c("one hundred and thirty four point twelve");
        let out = unsafe { take(glucograde_normalize(text.as_ptr())) };
        assert_eq!(out, "134.12");
        assert!(unsafe { glucograde_normalize(ptr::null()) }.is_null());
    }

    #[test]
    fn test_measurement() {
        let mut out = -1.0;
        let text = c("it is ninety nine");
        assert!(unsafe { glucograde_measurement(text.as_ptr(), &mut out) });
        assert_eq!(out, 99.0);

        let mut out = -1.0;
        let text = c("hello");
        assert!(!unsafe { glucograde_measurement(text.as_ptr(), &mut out) });
        assert_eq!(out, -1.0);
        assert!(!unsafe { glucograde_measurement(ptr::null(), &mut out) });
    }

    #[test]
    fn test_score_graded_and_advice() {
        let values = [1.0, 20.0, 5.0, 3.0, 2.0, 10.0, 5.0, 100.0];

        let score = unsafe { glucograde_score(values.as_ptr(), values.len(), 80.0, false) };
        assert!(score.success);
        assert!((score.score - 82.5).abs() < 1e-9);
        let label = unsafe { CStr::from_ptr(score.label) }.to_str().unwrap().to_string();
        assert_eq!(label, "B-");
        assert_eq!(score.icon, 1);
        unsafe { glucograde_free_score(score) };

        let score = unsafe { glucograde_score(values.as_ptr(), values.len(), 60.0, true) };
        assert!(score.success);
        let label = unsafe { CStr::from_ptr(score.label) }.to_str().unwrap().to_string();
        assert_eq!(label, "Consume a low snack first");
        unsafe { glucograde_free_score(score) };
    }

    #[test]
    fn test_score_errors() {
        let short = [1.0, 2.0, 3.0];
        let score = unsafe { glucograde_score(short.as_ptr(), short.len(), 80.0, false) };
        assert!(!score.success);
        assert!(!score.error_message.is_null());
        unsafe { glucograde_free_score(score) };

        // no slow nutrients in the low band
        let fast_only = [1.0, 20.0, 0.0, 0.0, 0.0, 10.0, 5.0];
        let score = unsafe { glucograde_score(fast_only.as_ptr(), fast_only.len(), 50.0, false) };
        assert!(!score.success);
        unsafe { glucograde_free_score(score) };

        let score = unsafe { glucograde_score(ptr::null(), 0, 80.0, false) };
        assert!(!score.success);
        unsafe { glucograde_free_score(score) };
    }

    #[test]
    fn test_process_roundtrip() {
        let config = missing_config();
        let handle = unsafe { glucograde_init(config.as_ptr()) };
        assert!(!handle.is_null());

        let text = c("my glucose is eighty five, can I have broccoli");
        let result = unsafe { glucograde_process(handle, text.as_ptr()) };
        assert!(result.score.success);
        assert!(result.has_measurement);
        assert_eq!(result.measurement, 85.0);
        assert_eq!(result.food_id, 50);
        let name = unsafe { CStr::from_ptr(result.food_name) }.to_str().unwrap().to_string();
        assert_eq!(name, "broccoli");
        unsafe { glucograde_free_result(result) };

        let text = c("nothing to eat");
        let result = unsafe { glucograde_process(handle, text.as_ptr()) };
        assert!(!result.score.success);
        assert_eq!(result.reference, 85.0);
        unsafe { glucograde_free_result(result) };

        unsafe { glucograde_destroy(handle) };
    }

    #[test]
    fn test_process_null_handle() {
        let text = c("banana");
        let result = unsafe { glucograde_process(ptr::null_mut(), text.as_ptr()) };
        assert!(!result.score.success);
        unsafe { glucograde_free_result(result) };
    }
}
