use crate::config::RunContext;
use crate::deps::{Editor, EditorKind};
use crate::error::{CurlpadError, Result};
use crate::workspace::TempWorkspace;
use log::debug;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

const VIM_CONFIG_FILE: &str = "curlpad.vimrc";
const NVIM_CONFIG_FILE: &str = "curlpad.lua";

/// Minimal editor config: shell syntax, 2-space indent and dictionary completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub kind: EditorKind,
    pub contents: String,
}

impl EditorConfig {
    pub fn render(kind: EditorKind, dictionary: &Path) -> Self {
        let dict = dictionary.display();
        let contents = match kind {
            EditorKind::Vim => format!(
                r#"set nocompatible
syntax on
filetype plugin indent on
set filetype=sh
set number
set autoindent
set tabstop=2
set shiftwidth=2
set expandtab
set backspace=indent,eol,start

" Dictionary completion for curl commands
set dictionary={dict}
set complete+=k
set completeopt=menu,menuone,preview

echo "Curl autocomplete available: Press Ctrl+X Ctrl+K in insert mode for completion"
"#
            ),
            EditorKind::Nvim => format!(
                r#"-- curlpad: curl completion for the scratch buffer
local dict_file = [[{dict}]]

vim.cmd('syntax on')
vim.cmd('filetype plugin indent on')
vim.o.number = true
vim.o.autoindent = true
vim.o.tabstop = 2
vim.o.shiftwidth = 2
vim.o.expandtab = true
vim.o.backspace = 'indent,eol,start'

local function setup_buffer(buf)
  vim.bo[buf].filetype = 'sh'
  vim.opt_local.dictionary = {{ dict_file }}
  vim.opt_local.complete:append('k')
  vim.opt_local.completeopt = {{ 'menu', 'menuone', 'preview' }}
  pcall(vim.keymap.set, 'i', '<C-Space>', '<C-x><C-k>', {{ buffer = buf, noremap = true, silent = true }})
end

vim.api.nvim_create_autocmd({{ 'BufEnter', 'BufWinEnter' }}, {{
  callback = function(args) setup_buffer(args.buf) end,
}})

vim.api.nvim_echo({{ {{ 'Curl autocomplete: Ctrl+Space or Ctrl+X Ctrl+K', 'Normal' }} }}, false, {{}})
"#
            ),
        };
        Self { kind, contents }
    }

    pub fn file_name(&self) -> &'static str {
        match self.kind {
            EditorKind::Vim => VIM_CONFIG_FILE,
            EditorKind::Nvim => NVIM_CONFIG_FILE,
        }
    }
}

/// Arguments that open `file` with `config` applied, cursor on `line`.
pub fn editor_args(
    kind: EditorKind,
    config: &Path,
    file: &Path,
    line: usize,
    insert: bool,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    match kind {
        EditorKind::Nvim => {
            args.extend(["--clean", "-u", "NONE"].map(OsString::from));
            args.push(file.as_os_str().to_owned());
            args.push("-c".into());
            let mut luafile = OsString::from("luafile ");
            luafile.push(config.as_os_str());
            args.push(luafile);
            args.push("-c".into());
            args.push("doautocmd BufEnter".into());
            args.push(format!("+{}", line).into());
            if insert {
                args.push("+startinsert".into());
            }
        }
        EditorKind::Vim => {
            args.push("-u".into());
            args.push(config.as_os_str().to_owned());
            args.push(format!("+{}", line).into());
            if insert {
                args.push("+startinsert".into());
            }
            args.push(file.as_os_str().to_owned());
        }
    }
    args
}

/// Writes the editor config into the workspace, opens `file` and waits for the editor
/// to exit.
pub fn open_editor(
    ctx: &RunContext,
    editor: &Editor,
    workspace: &TempWorkspace,
    file: &Path,
    dictionary: &Path,
    line: usize,
) -> Result<()> {
    let config = EditorConfig::render(editor.kind, dictionary);
    let config_path = workspace.write_file(config.file_name(), &config.contents)?;
    debug!(
        "Created editor config at {} ({:?})",
        config_path.display(),
        editor.kind
    );

    let args = editor_args(
        editor.kind,
        &config_path,
        file,
        line,
        ctx.config.cursor_insert,
    );
    debug!("Launching editor: {} {:?}", editor.path.display(), args);

    let status = Command::new(&editor.path)
        .args(&args)
        .status()
        .map_err(|e| {
            CurlpadError::Editor(format!(
                "Failed to launch editor '{}': {}",
                editor.path.display(),
                e
            ))
        })?;

    // `:cq` exits non-zero; the buffer must not be run.
    if status.success() {
        Ok(())
    } else {
        Err(CurlpadError::Editor(format!(
            "Editor '{}' exited with {}",
            editor.path.display(),
            status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn strs(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_vim_args() {
        let args = editor_args(
            EditorKind::Vim,
            Path::new("/tmp/w/curlpad.vimrc"),
            Path::new("/tmp/w/curlpad.sh"),
            12,
            true,
        );
        assert_eq!(
            strs(&args),
            vec![
                "-u",
                "/tmp/w/curlpad.vimrc",
                "+12",
                "+startinsert",
                "/tmp/w/curlpad.sh"
            ]
        );
    }

    #[test]
    fn test_nvim_args_without_insert() {
        let args = editor_args(
            EditorKind::Nvim,
            Path::new("/tmp/w/curlpad.lua"),
            Path::new("/tmp/w/curlpad.sh"),
            3,
            false,
        );
        assert_eq!(
            strs(&args),
            vec![
                "--clean",
                "-u",
                "NONE",
                "/tmp/w/curlpad.sh",
                "-c",
                "luafile /tmp/w/curlpad.lua",
                "-c",
                "doautocmd BufEnter",
                "+3"
            ]
        );
    }

    #[test]
    fn test_vim_config_points_at_dictionary() {
        let cfg = EditorConfig::render(EditorKind::Vim, Path::new("/tmp/w/curl.dict"));
        assert!(cfg.contents.contains("set dictionary=/tmp/w/curl.dict"));
        assert!(cfg.contents.contains("set complete+=k"));
        assert_eq!(cfg.file_name(), "curlpad.vimrc");
    }

    #[test]
    fn test_nvim_config_is_lua() {
        let cfg = EditorConfig::render(EditorKind::Nvim, Path::new("/tmp/w/curl.dict"));
        assert!(cfg.contents.contains("local dict_file = [[/tmp/w/curl.dict]]"));
        assert!(cfg.contents.contains("'<C-Space>', '<C-x><C-k>'"));
        assert!(cfg.contents.contains("vim.opt_local.dictionary = { dict_file }"));
        assert_eq!(cfg.file_name(), "curlpad.lua");
    }

    #[cfg(unix)]
    #[test]
    fn test_open_editor_runs_binary_and_tracks_config() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        let fake = bin.path().join("vim");
        // Appends a command to the file it was given (always the last argument).
        std::fs::write(
            &fake,
            "#!/bin/sh\nfor last; do :; done\necho 'curl -s http://localhost' >> \"$last\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let ws = TempWorkspace::create().unwrap();
        let file = ws.write_file("curlpad.sh", "# hi\n").unwrap();
        let dict = ws.write_file("curl.dict", "curl\n").unwrap();
        let editor = Editor::new(PathBuf::from(&fake));

        open_editor(&RunContext::default(), &editor, &ws, &file, &dict, 1).unwrap();

        let edited = std::fs::read_to_string(&file).unwrap();
        assert!(edited.contains("curl -s http://localhost"));
        assert!(ws
            .registry()
            .tracked()
            .contains(&ws.path().join("curlpad.vimrc")));
    }

    #[cfg(unix)]
    #[test]
    fn test_open_editor_rejects_cq_exit() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        let fake = bin.path().join("vim");
        std::fs::write(&fake, "#!/bin/sh\nexit 1\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let ws = TempWorkspace::create().unwrap();
        let file = ws.write_file("curlpad.sh", "").unwrap();
        let dict = ws.write_file("curl.dict", "").unwrap();

        let err = open_editor(
            &RunContext::default(),
            &Editor::new(fake),
            &ws,
            &file,
            &dict,
            1,
        )
        .unwrap_err();
        assert!(matches!(err, CurlpadError::Editor(_)));
    }
}
