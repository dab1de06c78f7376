use std::path::Path;

use serde_json::json;

use crate::fileapi::{CodemodelV2, FileApiProtocol};

/// Writes a codemodel reply with one target file per `(name, type, artifact)`.
pub(crate) fn write_reply(build_dir: &Path, targets: &[(&str, &str, Option<&str>)]) {
    let reply = CodemodelV2.reply_dir(build_dir);
    std::fs::create_dir_all(&reply).unwrap();

    let mut descriptors = Vec::new();
    for (i, (name, kind, artifact)) in targets.iter().enumerate() {
        let json_file = format!("target-{}-{i}.json", name.replace('/', "_"));
        let artifacts: Vec<_> = artifact.iter().map(|path| json!({ "path": path })).collect();
        let target = json!({ "name": name, "type": kind, "artifacts": artifacts });
        std::fs::write(reply.join(&json_file), target.to_string()).unwrap();
        descriptors.push(json!({ "name": name, "jsonFile": json_file }));
    }

    let index = json!({
        "configurations": [
            { "name": "Debug", "targets": descriptors },
            { "name": "Release", "targets": [] },
        ]
    });
    std::fs::write(reply.join("codemodel-v2-0001.json"), index.to_string()).unwrap();
}
