//! Windows backend: UI Automation for controls, Win32 for focus and input.

use windows::Win32::Foundation::{BOOL, HWND, LPARAM};
use windows::Win32::System::Com::{
    CLSCTX_INPROC_SERVER, COINIT_MULTITHREADED, CoCreateInstance, CoInitializeEx, CoUninitialize,
};
use windows::Win32::System::Threading::{AttachThreadInput, GetCurrentThreadId};
use windows::Win32::UI::Accessibility::{
    CUIAutomation, IUIAutomation, IUIAutomationElement, IUIAutomationValuePattern,
    TreeScope_Descendants, UIA_AutomationIdPropertyId, UIA_ControlTypePropertyId,
    UIA_EditControlTypeId, UIA_NamePropertyId, UIA_PaneControlTypeId, UIA_ValuePatternId,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP, SendInput,
    VK_RETURN,
};
use windows::Win32::UI::WindowsAndMessaging::{
    BringWindowToTop, EnumWindows, GetForegroundWindow, GetWindowThreadProcessId, IsIconic,
    IsWindowVisible, SW_RESTORE, SW_SHOW, SetForegroundWindow, ShowWindow,
};
use windows::core::{BSTR, VARIANT};

use tracing::{debug, warn};

use super::{AutomationSession, ControlId, DesktopAutomation};
use crate::error::AutomationError;

fn platform(err: &windows::core::Error) -> AutomationError {
    AutomationError::Platform(err.message().to_string())
}

// ============================================================================
// Window Lookup
// ============================================================================

struct WindowSearch {
    pid: u32,
    found: Option<HWND>,
}

unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the &mut WindowSearch passed by `main_window`.
    let search = unsafe { &mut *(lparam.0 as *mut WindowSearch) };
    let mut owner = 0u32;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut owner)) };
    if owner == search.pid && unsafe { IsWindowVisible(hwnd) }.as_bool() {
        search.found = Some(hwnd);
        return BOOL(0);
    }
    BOOL(1)
}

/// First visible top-level window owned by `pid`.
fn main_window(pid: u32) -> Option<HWND> {
    let mut search = WindowSearch { pid, found: None };
    // Stopping early makes EnumWindows report an error; only `found` matters.
    let _ = unsafe {
        EnumWindows(
            Some(collect_window),
            LPARAM(std::ptr::addr_of_mut!(search) as isize),
        )
    };
    search.found
}

// ============================================================================
// COM Lifetime
// ============================================================================

struct ComGuard {
    initialized: bool,
}

impl ComGuard {
    fn init() -> Self {
        let initialized = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) }.is_ok();
        Self { initialized }
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.initialized {
            unsafe { CoUninitialize() };
        }
    }
}

// ============================================================================
// Backend
// ============================================================================

/// UI Automation backend.
#[derive(Debug, Clone, Default)]
pub struct UiAutomation;

impl UiAutomation {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

impl DesktopAutomation for UiAutomation {
    fn focus_window(&self, pid: u32) -> Result<(), AutomationError> {
        let hwnd = main_window(pid).ok_or(AutomationError::NoWindow { pid })?;

        unsafe {
            if IsIconic(hwnd).as_bool() {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = BringWindowToTop(hwnd);

            if GetForegroundWindow() != hwnd {
                let current = GetCurrentThreadId();
                let target = GetWindowThreadProcessId(hwnd, None);
                let attached =
                    target != current && AttachThreadInput(current, target, BOOL::from(true)).as_bool();
                let _ = SetForegroundWindow(hwnd);
                let _ = BringWindowToTop(hwnd);
                if attached {
                    let _ = AttachThreadInput(current, target, BOOL::from(false));
                }
            }

            if GetForegroundWindow() == hwnd {
                Ok(())
            } else {
                Err(AutomationError::Focus(
                    "window did not reach the foreground".to_string(),
                ))
            }
        }
    }

    fn attach(&self, pid: u32) -> Result<Box<dyn AutomationSession>, AutomationError> {
        let com = ComGuard::init();
        let automation: IUIAutomation =
            unsafe { CoCreateInstance(&CUIAutomation, None, CLSCTX_INPROC_SERVER) }
                .map_err(|e| platform(&e))?;

        let hwnd = main_window(pid).ok_or(AutomationError::NoWindow { pid })?;
        let window = unsafe { automation.ElementFromHandle(hwnd) }
            .map_err(|_| AutomationError::NoWindow { pid })?;
        debug!(pid, "Attached to main window");

        Ok(Box::new(UiaSession {
            automation,
            scope: window,
            controls: Vec::new(),
            _com: com,
        }))
    }
}

// ============================================================================
// Session
// ============================================================================

struct UiaSession {
    automation: IUIAutomation,
    scope: IUIAutomationElement,
    controls: Vec<IUIAutomationElement>,
    // Dropped last so COM outlives every interface above.
    _com: ComGuard,
}

impl UiaSession {
    fn find_first(
        &self,
        property: windows::Win32::UI::Accessibility::UIA_PROPERTY_ID,
        value: VARIANT,
        control_type: i32,
    ) -> windows::core::Result<IUIAutomationElement> {
        unsafe {
            let by_property = self.automation.CreatePropertyCondition(property, &value)?;
            let by_type = self
                .automation
                .CreatePropertyCondition(UIA_ControlTypePropertyId, &VARIANT::from(control_type))?;
            let condition = self.automation.CreateAndCondition(&by_property, &by_type)?;
            self.scope.FindFirst(TreeScope_Descendants, &condition)
        }
    }

    fn control(&self, control: ControlId) -> Result<&IUIAutomationElement, AutomationError> {
        self.controls
            .get(control.0)
            .ok_or_else(|| AutomationError::ControlNotFound(format!("#{}", control.0)))
    }
}

impl AutomationSession for UiaSession {
    fn narrow_to_pane(&mut self, name: &str) -> bool {
        match self.find_first(
            UIA_NamePropertyId,
            VARIANT::from(BSTR::from(name)),
            UIA_PaneControlTypeId.0,
        ) {
            Ok(pane) => {
                self.scope = pane;
                true
            }
            Err(_) => false,
        }
    }

    fn find_edit(&mut self, automation_id: &str) -> Result<ControlId, AutomationError> {
        let element = self
            .find_first(
                UIA_AutomationIdPropertyId,
                VARIANT::from(BSTR::from(automation_id)),
                UIA_EditControlTypeId.0,
            )
            .map_err(|_| AutomationError::ControlNotFound(automation_id.to_string()))?;
        self.controls.push(element);
        Ok(ControlId(self.controls.len() - 1))
    }

    fn focus(&mut self, control: ControlId) -> Result<(), AutomationError> {
        let element = self.control(control)?;
        unsafe { element.SetFocus() }.map_err(|e| platform(&e))
    }

    fn set_value(&mut self, control: ControlId, value: &str) -> Result<(), AutomationError> {
        let element = self.control(control)?;
        let set = |element: &IUIAutomationElement| -> windows::core::Result<()> {
            unsafe {
                let pattern: IUIAutomationValuePattern =
                    element.GetCurrentPatternAs(UIA_ValuePatternId)?;
                pattern.SetValue(&BSTR::new())?;
                pattern.SetValue(&BSTR::from(value))
            }
        };
        set(element).map_err(|e| AutomationError::SetValue {
            control: format!("#{}", control.0),
            reason: e.message().to_string(),
        })
    }

    fn press_enter(&mut self) -> Result<(), AutomationError> {
        let key = |flags: KEYBD_EVENT_FLAGS| INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VK_RETURN,
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        let inputs = [key(KEYBD_EVENT_FLAGS(0)), key(KEYEVENTF_KEYUP)];
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize == inputs.len() {
            Ok(())
        } else {
            warn!(sent, "SendInput was partially blocked");
            Err(AutomationError::Input(format!(
                "only {sent} of {} key events delivered",
                inputs.len()
            )))
        }
    }
}
