/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : viz 模块单元测试
 */

mod render;
