// COM apartment guard and wide-string helpers

use anyhow::bail;
use windows::Win32::Foundation::RPC_E_CHANGED_MODE;
use windows::Win32::System::Com::{
    CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED, COINIT_DISABLE_OLE1DDE,
};

/// Keeps the calling thread inside a single-threaded COM apartment until dropped.
///
/// Not `Send`: the apartment belongs to the thread that entered it.
pub struct ComApartment {
    balanced: bool,
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ComApartment {
    pub fn enter() -> anyhow::Result<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED | COINIT_DISABLE_OLE1DDE) };
        if hr == RPC_E_CHANGED_MODE {
            // Already initialized with another model; usable, but not ours to uninitialize.
            tracing::debug!(event = "com_mode_already_set", component = "catalog");
            return Ok(ComApartment {
                balanced: false,
                _not_send: std::marker::PhantomData,
            });
        }
        if hr.is_err() {
            bail!("CoInitializeEx failed: {:?}", hr);
        }
        Ok(ComApartment {
            balanced: true,
            _not_send: std::marker::PhantomData,
        })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.balanced {
            unsafe { CoUninitialize() };
        }
    }
}

pub fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Lossy UTF-16 decode, stopping at the first NUL.
pub fn from_wide(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}
