//! Reading a picked file into an [`EncodedImage`]

use std::cell::RefCell;
use std::rc::Rc;

use chronosnap_common::codec::is_image_mime;
use chronosnap_common::{EncodedImage, Error};
use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, ProgressEvent};

/// Reads an `image/*` file unchanged.
pub async fn read_image(file: File) -> Result<EncodedImage, Error> {
    let mime_type = file.type_();
    if !is_image_mime(&mime_type) {
        return Err(Error::UnsupportedMimeType(if mime_type.is_empty() {
            file.name()
        } else {
            mime_type
        }));
    }

    let data_url = read_as_data_url(&file).await.map_err(Error::Format)?;
    EncodedImage::parse(&data_url)
}

async fn read_as_data_url(file: &File) -> Result<String, String> {
    let reader = FileReader::new().map_err(|e| format!("{e:?}"))?;
    let (tx, rx) = oneshot::channel::<Result<String, String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let onload = {
        let tx = tx.clone();
        let reader = reader.clone();
        Closure::wrap(Box::new(move |_: ProgressEvent| {
            let result = reader
                .result()
                .ok()
                .and_then(|value| value.as_string())
                .ok_or_else(|| "file could not be read".to_string());
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(result);
            }
        }) as Box<dyn FnMut(_)>)
    };
    let onerror = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move |_: ProgressEvent| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err("file could not be read".to_string()));
            }
        }) as Box<dyn FnMut(_)>)
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    reader
        .read_as_data_url(file)
        .map_err(|e| format!("{e:?}"))?;

    // the closures stay alive until the reader has answered
    let result = rx.await.map_err(|_| "file read was cancelled".to_string());
    reader.set_onload(None);
    reader.set_onerror(None);
    result?
}
