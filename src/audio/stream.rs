use std::path::Path;

use windows as Windows;
use Windows::core::GUID;
use Windows::Win32::Media::Speech::{ISpStream, SpStream, SPFM_CREATE_ALWAYS};
use Windows::Win32::System::Com::{CoCreateInstance, CLSCTX_ALL};

use crate::Result;

use super::AudioFormat;

/// A SAPI stream bound to a WAV file.
pub(crate) struct AudioStream {
    intf: ISpStream,
}

#[allow(non_upper_case_globals)]
const SPDFID_WaveFormatEx: GUID = GUID::from_u128(0xc31adbae_527f_4ff5_a230_f62bb61ff70c);

impl AudioStream {
    pub fn create_file<P: AsRef<Path>>(path: P, format: &AudioFormat) -> Result<Self> {
        let intf: ISpStream = unsafe { CoCreateInstance(&SpStream, None, CLSCTX_ALL) }?;
        unsafe {
            intf.BindToFile(
                path.as_ref().as_os_str(),
                SPFM_CREATE_ALWAYS,
                &SPDFID_WaveFormatEx,
                &format.to_sapi(),
                0,
            )
        }?;
        Ok(Self {
            intf,
        })
    }

    pub fn close(&self) -> Result<()> {
        unsafe { self.intf.Close() }?;
        Ok(())
    }

    pub fn to_sapi(&self) -> ISpStream {
        self.intf.clone()
    }
}
